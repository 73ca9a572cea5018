// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Larkmaster configuration system.

use larkmaster_config::diagnostic::ConfigError;
use larkmaster_config::{
    load_and_validate_path, load_and_validate_str, load_config_from_str, LarkmasterConfig,
};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[agent]
name = "sales-bot"
log_level = "debug"

[lark]
app_id = "cli_a1b2"
app_secret = "s3cret"
base_url = "https://open.larksuite.com/open-apis"
web_base_url = "https://example.larksuite.com"
request_timeout_secs = 10

[auth]
safety_margin_secs = 120
refresh_timeout_secs = 5

[intent]
generic_table = 0.45
search = 0.55

[gateway]
host = "0.0.0.0"
port = 9000
bearer_token = "gw"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "sales-bot");
    assert_eq!(config.lark.credentials(), Some(("cli_a1b2", "s3cret")));
    assert_eq!(config.lark.base_url, "https://open.larksuite.com/open-apis");
    assert_eq!(config.lark.request_timeout_secs, 10);
    assert_eq!(config.auth.safety_margin_secs, 120);
    assert_eq!(config.auth.refresh_timeout_secs, 5);
    assert_eq!(config.intent.generic_table, 0.45);
    assert_eq!(config.intent.search, 0.55);
    // untouched confidences keep their defaults
    assert_eq!(config.intent.template_table, 0.7);
    assert_eq!(config.gateway.port, 9000);
    assert_eq!(config.gateway.bearer_token.as_deref(), Some("gw"));
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.agent.name, "larkmaster");
    assert_eq!(config.agent.log_level, "info");
    assert!(config.lark.credentials().is_none());
    assert_eq!(config.lark.base_url, "https://open.feishu.cn/open-apis");
    assert_eq!(config.auth.safety_margin_secs, 300);
    assert_eq!(config.auth.refresh_timeout_secs, 30);
    assert_eq!(config.gateway.host, "127.0.0.1");
    assert_eq!(config.gateway.port, 8000);
    assert!(config.gateway.bearer_token.is_none());
}

#[test]
fn unknown_section_rejected() {
    let err = load_config_from_str("[storage]\npath = \"x\"\n").expect_err("unknown section");
    assert!(format!("{err}").contains("storage"));
}

#[test]
fn typo_in_lark_section_gets_suggestion() {
    let toml = "[lark]\napp_secert = \"x\"\n";
    let errors = load_and_validate_str(toml).expect_err("typo should fail");
    let suggestion = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } if key == "app_secert" => suggestion.clone(),
        _ => None,
    });
    assert_eq!(suggestion.as_deref(), Some("app_secret"));
}

#[test]
fn invalid_type_reports_key() {
    let toml = "[gateway]\nport = \"eighty\"\n";
    let errors = load_and_validate_str(toml).expect_err("wrong type");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::InvalidType { key, .. } if key.contains("port")
    )));
}

#[test]
fn validation_runs_after_deserialization() {
    let toml = "[intent]\nexecute_threshold = 0.2\nuncertain_threshold = 0.5\n";
    let errors = load_and_validate_str(toml).expect_err("inverted bands");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("uncertain_threshold"))));
}

#[test]
fn diagnostics_render_with_miette() {
    let errors = load_and_validate_str("[agent]\nnaem = \"x\"\n").expect_err("typo");
    let handler = miette::GraphicalReportHandler::new();
    let mut buf = String::new();
    handler
        .render_report(&mut buf, &errors[0] as &dyn miette::Diagnostic)
        .expect("render");
    assert!(buf.contains("naem"));
    assert!(buf.contains("larkmaster::config::unknown_key"));
}

#[test]
fn explicit_path_with_env_override() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[gateway]\nport = 7000\n")?;
        jail.set_env("LARKMASTER_GATEWAY_HOST", "localhost");
        let config: LarkmasterConfig =
            load_and_validate_path(std::path::Path::new("custom.toml")).expect("valid");
        assert_eq!(config.gateway.port, 7000);
        assert_eq!(config.gateway.host, "localhost");
        Ok(())
    });
}

#[test]
fn missing_explicit_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = load_and_validate_path(&dir.path().join("absent.toml")).expect("defaults");
    assert_eq!(config.gateway.port, 8000);
}
