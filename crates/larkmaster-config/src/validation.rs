// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::LarkmasterConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &LarkmasterConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "agent.log_level `{}` is not one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    check_url(&mut errors, "lark.base_url", &config.lark.base_url);
    check_url(&mut errors, "lark.web_base_url", &config.lark.web_base_url);

    if config.lark.request_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "lark.request_timeout_secs must be at least 1",
        ));
    }

    match (&config.lark.app_id, &config.lark.app_secret) {
        (Some(_), None) => errors.push(ConfigError::validation(
            "lark.app_id is set but lark.app_secret is missing",
        )),
        (None, Some(_)) => errors.push(ConfigError::validation(
            "lark.app_secret is set but lark.app_id is missing",
        )),
        _ => {}
    }

    if config.auth.refresh_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "auth.refresh_timeout_secs must be at least 1",
        ));
    }

    let intent = &config.intent;
    for (key, value) in [
        ("help", intent.help),
        ("template_table", intent.template_table),
        ("generic_table", intent.generic_table),
        ("wiki", intent.wiki),
        ("document", intent.document),
        ("task", intent.task),
        ("search", intent.search),
        ("execute_threshold", intent.execute_threshold),
        ("uncertain_threshold", intent.uncertain_threshold),
    ] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(ConfigError::validation(format!(
                "intent.{key} must be within [0.0, 1.0], got {value}"
            )));
        }
    }
    if intent.uncertain_threshold > intent.execute_threshold {
        errors.push(ConfigError::validation(format!(
            "intent.uncertain_threshold ({}) must not exceed intent.execute_threshold ({})",
            intent.uncertain_threshold, intent.execute_threshold
        )));
    }

    let host = config.gateway.host.trim();
    let is_ip = host.parse::<std::net::IpAddr>().is_ok();
    let is_hostname = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if !is_ip && !is_hostname {
        errors.push(ConfigError::validation(format!(
            "gateway.host `{host}` is not a valid IP address or hostname"
        )));
    }

    if config
        .gateway
        .bearer_token
        .as_ref()
        .is_some_and(|token| token.trim().is_empty())
    {
        errors.push(ConfigError::validation(
            "gateway.bearer_token must not be empty when set",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ConfigError>, key: &str, value: &str) {
    if !(value.starts_with("https://") || value.starts_with("http://")) {
        errors.push(ConfigError::validation(format!(
            "{key} `{value}` must start with http:// or https://"
        )));
    } else if value.ends_with('/') {
        errors.push(ConfigError::validation(format!(
            "{key} `{value}` must not end with a slash"
        )));
    }
}
