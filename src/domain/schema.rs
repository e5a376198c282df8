use std::fmt;

use serde::{Deserialize, Serialize};

/// Input widget a field is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Password,
    Dropdown,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Password => "password",
            FieldType::Dropdown => "dropdown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, kind: FieldType, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            label: label.into(),
            required: false,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn display_label(&self) -> String {
        if self.required {
            format!("{} *", self.label)
        } else {
            self.label.clone()
        }
    }

    pub fn is_masked(&self) -> bool {
        self.kind == FieldType::Password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_catalog_shape() {
        let field: FieldSchema = serde_json::from_str(
            r#"{"name":"state","type":"dropdown","label":"State","required":true,"options":["Goa","Assam"]}"#,
        )
        .expect("field");
        assert_eq!(field.kind, FieldType::Dropdown);
        assert!(field.required);
        assert_eq!(field.options, vec!["Goa", "Assam"]);
    }

    #[test]
    fn required_and_options_default_when_absent() {
        let field: FieldSchema =
            serde_json::from_str(r#"{"name":"city","type":"text","label":"City"}"#).expect("field");
        assert!(!field.required);
        assert!(field.options.is_empty());
        assert_eq!(field.display_label(), "City");
    }

    #[test]
    fn required_marker_in_label() {
        let field = FieldSchema::new("cvv", FieldType::Password, "CVV").required();
        assert_eq!(field.display_label(), "CVV *");
        assert!(field.is_masked());
    }
}
