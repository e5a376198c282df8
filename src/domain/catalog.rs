use std::{fs, path::Path};

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use super::schema::{FieldSchema, FieldType};
use crate::io::{DocumentFormat, parse_document_str};

pub const USER_INFORMATION: &str = "User Information";
pub const ADDRESS_INFORMATION: &str = "Address Information";
pub const PAYMENT_INFORMATION: &str = "Payment Information";

const STATE_OPTIONS: &[&str] = &[
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(String),
    #[error("catalog does not match the expected shape")]
    Shape(#[from] serde_json::Error),
    #[error("dropdown field `{field}` in `{category}` declares no options")]
    MissingOptions { category: String, field: String },
    #[error("field `{field}` appears twice in `{category}`")]
    DuplicateField { category: String, field: String },
}

/// Ordered mapping from category name to the fields rendered for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    categories: IndexMap<String, Vec<FieldSchema>>,
}

impl Catalog {
    pub fn new(categories: IndexMap<String, Vec<FieldSchema>>) -> Result<Self, CatalogError> {
        for (category, fields) in &categories {
            let mut seen = Vec::with_capacity(fields.len());
            for field in fields {
                if field.kind == FieldType::Dropdown && field.options.is_empty() {
                    return Err(CatalogError::MissingOptions {
                        category: category.clone(),
                        field: field.name.clone(),
                    });
                }
                if seen.contains(&field.name.as_str()) {
                    return Err(CatalogError::DuplicateField {
                        category: category.clone(),
                        field: field.name.clone(),
                    });
                }
                seen.push(field.name.as_str());
            }
        }
        Ok(Self { categories })
    }

    /// The three categories the form ships with.
    pub fn builtin() -> Self {
        let mut categories = IndexMap::new();
        categories.insert(
            USER_INFORMATION.to_string(),
            vec![
                FieldSchema::new("firstName", FieldType::Text, "First Name").required(),
                FieldSchema::new("lastName", FieldType::Text, "Last Name").required(),
                FieldSchema::new("age", FieldType::Number, "Age"),
            ],
        );
        categories.insert(
            ADDRESS_INFORMATION.to_string(),
            vec![
                FieldSchema::new("street", FieldType::Text, "Street").required(),
                FieldSchema::new("city", FieldType::Text, "City").required(),
                FieldSchema::new("state", FieldType::Dropdown, "State")
                    .with_options(STATE_OPTIONS.iter().copied())
                    .required(),
                FieldSchema::new("zipCode", FieldType::Text, "Zip Code"),
            ],
        );
        categories.insert(
            PAYMENT_INFORMATION.to_string(),
            vec![
                FieldSchema::new("cardNumber", FieldType::Text, "Card Number").required(),
                FieldSchema::new("expiryDate", FieldType::Date, "Expiry Date").required(),
                FieldSchema::new("cvv", FieldType::Password, "CVV").required(),
                FieldSchema::new("cardholderName", FieldType::Text, "Cardholder Name").required(),
            ],
        );
        Self { categories }
    }

    pub fn from_json_str(contents: &str) -> Result<Self, CatalogError> {
        Self::from_document_str(contents, DocumentFormat::Json)
    }

    pub fn from_document_str(contents: &str, format: DocumentFormat) -> Result<Self, CatalogError> {
        let value = parse_document_str(contents, format)
            .map_err(|err| CatalogError::Parse(format!("{err:#}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, CatalogError> {
        let categories: IndexMap<String, Vec<FieldSchema>> = serde_json::from_value(value)?;
        Self::new(categories)
    }

    /// Load a catalog file; the format follows the file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let format = DocumentFormat::from_extension(path).unwrap_or_default();
        Self::from_document_str(&contents, format)
    }

    /// Fields for `category`, empty when the catalog does not know it.
    pub fn fields(&self, category: &str) -> &[FieldSchema] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_keeps_category_order() {
        let catalog = Catalog::builtin();
        let names: Vec<_> = catalog.names().collect();
        assert_eq!(
            names,
            vec![USER_INFORMATION, ADDRESS_INFORMATION, PAYMENT_INFORMATION]
        );
        let state = &catalog.fields(ADDRESS_INFORMATION)[2];
        assert_eq!(state.kind, FieldType::Dropdown);
        assert_eq!(state.options.len(), 28);
    }

    #[test]
    fn unknown_category_has_no_fields() {
        let catalog = Catalog::builtin();
        assert!(catalog.fields("Shipping").is_empty());
        assert!(catalog.fields("").is_empty());
        assert!(!catalog.contains(""));
    }

    #[test]
    fn parses_json_catalog_in_order() {
        let catalog = Catalog::from_json_str(
            r#"{
                "Zeta": [{"name": "z", "type": "text", "label": "Z"}],
                "Alpha": [{"name": "a", "type": "number", "label": "A", "required": true}]
            }"#,
        )
        .expect("catalog");
        let names: Vec<_> = catalog.names().collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
        assert!(catalog.fields("Alpha")[0].required);
    }

    #[test]
    fn rejects_dropdown_without_options() {
        let err = Catalog::from_json_str(
            r#"{"Prefs": [{"name": "color", "type": "dropdown", "label": "Color"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::MissingOptions { .. }));
    }

    #[test]
    fn rejects_duplicate_field_names() {
        let err = Catalog::from_json_str(
            r#"{"Prefs": [
                {"name": "a", "type": "text", "label": "A"},
                {"name": "a", "type": "text", "label": "Again"}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateField { .. }));
    }

    #[test]
    fn rejects_unknown_field_type() {
        let err = Catalog::from_json_str(
            r#"{"Prefs": [{"name": "a", "type": "checkbox", "label": "A"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::Shape(_)));
    }
}
