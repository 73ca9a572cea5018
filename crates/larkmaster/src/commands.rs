// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offline subcommands: `classify`, `templates`, `design`.
//!
//! None of these talk to the platform, so they run without app credentials.

use std::fmt::Write;
use std::sync::Arc;

use larkmaster_bitable::{DocumentationGenerator, SchemaBuilder, TemplateCatalog};
use larkmaster_config::LarkmasterConfig;
use larkmaster_core::LarkError;
use larkmaster_intent::{IntentClassifier, RoutingPolicy};
use serde_json::{json, Value};

pub fn classify(config: &LarkmasterConfig, message: &str) -> Result<(), LarkError> {
    println!("{}", pretty(&classify_report(config, message))?);
    Ok(())
}

pub fn templates() -> Result<(), LarkError> {
    print!("{}", templates_listing(&TemplateCatalog::builtin()));
    Ok(())
}

pub fn design(
    config: &LarkmasterConfig,
    message: &str,
    name: Option<&str>,
    docs: bool,
) -> Result<(), LarkError> {
    println!("{}", design_output(config, message, name, docs)?);
    Ok(())
}

fn classify_report(config: &LarkmasterConfig, message: &str) -> Value {
    let catalog = Arc::new(TemplateCatalog::builtin());
    let classifier = IntentClassifier::from_config(catalog, &config.intent);
    let intent = classifier.classify(message);
    let band = RoutingPolicy::from(&config.intent).band(&intent);
    json!({
        "command_type": intent.command_type(),
        "confidence": intent.confidence(),
        "band": band.to_string(),
        "parameters": intent.parameters(),
    })
}

fn templates_listing(catalog: &TemplateCatalog) -> String {
    let mut out = String::new();
    for template in catalog.list_all() {
        let _ = writeln!(out, "{}  {}", template.name, template.description);
        let _ = writeln!(out, "    keywords: {}", template.keywords.join(", "));
        let fields: Vec<String> = template
            .fields
            .iter()
            .map(|f| format!("{} ({})", f.name, f.field_type))
            .collect();
        let _ = writeln!(out, "    fields: {}", fields.join(", "));
    }
    out
}

fn design_output(
    config: &LarkmasterConfig,
    message: &str,
    name: Option<&str>,
    docs: bool,
) -> Result<String, LarkError> {
    let catalog = Arc::new(TemplateCatalog::builtin());
    let intent =
        IntentClassifier::from_config(catalog.clone(), &config.intent).classify_table(message);
    let design = SchemaBuilder::new(catalog).build(&intent, name)?;
    if docs {
        Ok(DocumentationGenerator::new().generate(&design))
    } else {
        let value = serde_json::to_value(&design)
            .map_err(|e| LarkError::Internal(format!("serialize design: {e}")))?;
        pretty(&value)
    }
}

fn pretty(value: &Value) -> Result<String, LarkError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| LarkError::Internal(format!("serialize output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_report_includes_band() {
        let report = classify_report(&LarkmasterConfig::default(), "テーブルを作って");
        assert_eq!(report["command_type"], "create_bitable");
        assert_eq!(report["band"], "uncertain");
    }

    #[test]
    fn templates_listing_covers_catalog() {
        let catalog = TemplateCatalog::builtin();
        let listing = templates_listing(&catalog);
        assert!(listing.starts_with("顧客管理  顧客情報を管理するテーブル\n"));
        assert!(listing.contains("会社名 (TEXT)"));
        assert_eq!(listing.lines().count(), catalog.len() * 3);
    }

    #[test]
    fn design_as_docs_or_json() {
        let config = LarkmasterConfig::default();
        let md = design_output(&config, "顧客管理テーブルを作成して", None, true).unwrap();
        assert!(md.starts_with("# 顧客管理Base\n"));

        let json = design_output(&config, "顧客管理テーブルを作成して", Some("営業台帳"), false).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "営業台帳");
    }

    #[test]
    fn design_rejects_bad_override() {
        let err = design_output(&LarkmasterConfig::default(), "テーブルを作って", Some(&"x".repeat(101)), false)
            .unwrap_err();
        assert!(matches!(err, LarkError::Build(_)));
    }
}
