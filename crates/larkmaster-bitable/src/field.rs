// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bitable field types and field definitions.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use strum::{Display, EnumIter, EnumString};

/// Bitable column type, with the numeric code the open API uses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Text,
    Number,
    Select,
    MultiSelect,
    Date,
    Checkbox,
    /// Person.
    User,
    Phone,
    Url,
    Attachment,
    /// Link to records of another table.
    Link,
    Formula,
    CreatedTime,
    ModifiedTime,
    CreatedBy,
    ModifiedBy,
    AutoNumber,
}

impl FieldType {
    pub fn code(self) -> u16 {
        match self {
            FieldType::Text => 1,
            FieldType::Number => 2,
            FieldType::Select => 3,
            FieldType::MultiSelect => 4,
            FieldType::Date => 5,
            FieldType::Checkbox => 7,
            FieldType::User => 11,
            FieldType::Phone => 13,
            FieldType::Url => 15,
            FieldType::Attachment => 17,
            FieldType::Link => 18,
            FieldType::Formula => 20,
            FieldType::CreatedTime => 1001,
            FieldType::ModifiedTime => 1002,
            FieldType::CreatedBy => 1003,
            FieldType::ModifiedBy => 1004,
            FieldType::AutoNumber => 1005,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        use strum::IntoEnumIterator;
        FieldType::iter().find(|t| t.code() == code)
    }

    /// SELECT and MULTI_SELECT carry an option list.
    pub fn is_choice(self) -> bool {
        matches!(self, FieldType::Select | FieldType::MultiSelect)
    }
}

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            options: Vec::new(),
            required: false,
            description: String::new(),
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

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Checks the options invariant: present exactly for choice types.
    pub fn check(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("field name is empty".to_string());
        }
        match (self.field_type.is_choice(), self.options.is_empty()) {
            (true, true) => Err(format!("{} field has no options", self.field_type)),
            (false, false) => Err(format!("{} field cannot have options", self.field_type)),
            _ => Ok(()),
        }
    }

    /// Request body for the add-field endpoint.
    pub fn to_api_format(&self) -> Value {
        let mut body = json!({
            "field_name": self.name,
            "type": self.field_type.code(),
        });
        if self.field_type.is_choice() && !self.options.is_empty() {
            body["property"] = json!({
                "options": self.options.iter().map(|o| json!({ "name": o })).collect::<Vec<_>>(),
            });
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn codes_are_unique_and_reversible() {
        for t in FieldType::iter() {
            assert_eq!(FieldType::from_code(t.code()), Some(t));
        }
        assert_eq!(FieldType::from_code(6), None);
        assert_eq!(FieldType::User.code(), 11);
        assert_eq!(FieldType::AutoNumber.code(), 1005);
    }

    #[test]
    fn display_uses_screaming_snake_case() {
        assert_eq!(FieldType::MultiSelect.to_string(), "MULTI_SELECT");
        assert_eq!(FieldType::CreatedTime.to_string(), "CREATED_TIME");
    }

    #[test]
    fn api_format_includes_options_only_for_choices() {
        let select = FieldDefinition::new("優先度", FieldType::Select).with_options(["高", "中", "低"]);
        let body = select.to_api_format();
        assert_eq!(body["type"], 3);
        assert_eq!(body["property"]["options"][1]["name"], "中");

        let text = FieldDefinition::new("備考", FieldType::Text);
        let body = text.to_api_format();
        assert_eq!(body["field_name"], "備考");
        assert!(body.get("property").is_none());
    }

    #[test]
    fn check_enforces_options_invariant() {
        assert!(FieldDefinition::new("s", FieldType::Select).check().is_err());
        assert!(FieldDefinition::new("t", FieldType::Text)
            .with_options(["a"])
            .check()
            .is_err());
        assert!(FieldDefinition::new(" ", FieldType::Text).check().is_err());
        assert!(FieldDefinition::new("m", FieldType::MultiSelect)
            .with_options(["a"])
            .check()
            .is_ok());
    }
}
