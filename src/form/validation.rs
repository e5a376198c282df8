use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::domain::FieldSchema;

/// Current value of every edited field in the active category.
pub type FormValues = IndexMap<String, String>;

/// One message per field; an absent entry means the field is fine.
pub type ValidationErrors = IndexMap<String, String>;

pub const AGE_FIELD: &str = "age";
pub const CARD_NUMBER_FIELD: &str = "cardNumber";

pub const AGE_RANGE_MESSAGE: &str = "Please enter a valid age between 1 and 120";
pub const CARD_NUMBER_MESSAGE: &str = "Card Number must be 13 to 16 digits with space";

static CARD_NUMBER_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s]*$").expect("card number input pattern"));

static CARD_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}[\s0-9]{13,16}$").expect("card number pattern"));

/// Whether `value` may replace the current content of `field` at all.
pub fn accepts_input(field: &FieldSchema, value: &str) -> bool {
    if field.name == CARD_NUMBER_FIELD {
        return CARD_NUMBER_INPUT.is_match(value);
    }
    true
}

/// Check every field of the active schema; empty result means the form may
/// be committed.
pub fn validate(fields: &[FieldSchema], values: &FormValues) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for field in fields {
        let value = values.get(&field.name).map(String::as_str).unwrap_or("");
        if field.required && value.is_empty() {
            errors.insert(field.name.clone(), format!("{} is required", field.label));
        }
        if value.is_empty() {
            continue;
        }
        if field.name == AGE_FIELD && age_out_of_range(value) {
            errors.insert(field.name.clone(), AGE_RANGE_MESSAGE.to_string());
        }
        // Both checks have to fail before the number is rejected.
        if field.name == CARD_NUMBER_FIELD
            && !CARD_NUMBER_PATTERN.is_match(value)
            && value.chars().count() != 16
        {
            errors.insert(field.name.clone(), CARD_NUMBER_MESSAGE.to_string());
        }
    }
    errors
}

/// Blank values count as 0; other values that do not parse as a number are
/// not range-checked.
fn age_out_of_range(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return true;
    }
    match trimmed.parse::<f64>() {
        Ok(age) => age <= 0.0 || age > 120.0,
        Err(_) => false,
    }
}
