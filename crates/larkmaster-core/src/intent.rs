// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classified intent of a chat message.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The closed set of commands a message can resolve to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    CreateBitable,
    CreateWiki,
    CreateDocument,
    CreateTask,
    Search,
    Help,
    Unknown,
}

/// Values pulled out of the message text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentParameters {
    /// The message exactly as received.
    pub raw_message: String,
    /// Catalog template resolved from keywords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Free-text name, from quotes or `名前は …`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Task title; empty when the message had no `:` delimiter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field names listed after `フィールド:` and similar markers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl IntentParameters {
    pub fn new(raw_message: impl Into<String>) -> Self {
        Self {
            raw_message: raw_message.into(),
            ..Self::default()
        }
    }
}

/// Command, confidence, and parameters for one message.
///
/// Built once by the classifier; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    command_type: CommandType,
    confidence: f32,
    parameters: IntentParameters,
}

impl IntentResult {
    /// `confidence` is clamped into `[0, 1]`; NaN becomes 0.
    pub fn new(command_type: CommandType, confidence: f32, parameters: IntentParameters) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            command_type,
            confidence,
            parameters,
        }
    }

    pub fn unknown(raw_message: impl Into<String>) -> Self {
        Self::new(CommandType::Unknown, 0.0, IntentParameters::new(raw_message))
    }

    pub fn command_type(&self) -> CommandType {
        self.command_type
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn parameters(&self) -> &IntentParameters {
        &self.parameters
    }

    pub fn template(&self) -> Option<&str> {
        self.parameters.template.as_deref()
    }

    pub fn raw_message(&self) -> &str {
        &self.parameters.raw_message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped() {
        let p = IntentParameters::new("x");
        assert_eq!(IntentResult::new(CommandType::Help, 1.5, p.clone()).confidence(), 1.0);
        assert_eq!(IntentResult::new(CommandType::Help, -0.1, p.clone()).confidence(), 0.0);
        assert_eq!(IntentResult::new(CommandType::Help, f32::NAN, p).confidence(), 0.0);
    }

    #[test]
    fn serializes_snake_case_without_empty_parameters() {
        let result = IntentResult::unknown("こんにちは");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["command_type"], "unknown");
        assert_eq!(json["parameters"]["raw_message"], "こんにちは");
        assert!(json["parameters"].get("template").is_none());
        assert!(json["parameters"].get("fields").is_none());
    }

    #[test]
    fn command_type_names_are_stable() {
        use strum::IntoEnumIterator;
        let names: Vec<String> = CommandType::iter().map(|c| c.to_string()).collect();
        assert_eq!(
            names,
            [
                "create_bitable",
                "create_wiki",
                "create_document",
                "create_task",
                "search",
                "help",
                "unknown"
            ]
        );
    }
}
