// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Larkmaster.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Larkmaster configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LarkmasterConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Lark Open Platform app credentials and endpoints.
    #[serde(default)]
    pub lark: LarkConfig,

    /// Tenant token lifecycle settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Intent classifier confidences and routing bands.
    #[serde(default)]
    pub intent: IntentConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Process identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in logs and bot replies.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "larkmaster".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Lark Open Platform configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LarkConfig {
    /// App ID of the custom app. `None` disables every platform call.
    #[serde(default)]
    pub app_id: Option<String>,

    /// App secret of the custom app.
    #[serde(default)]
    pub app_secret: Option<String>,

    /// Base URL of the open API, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL used to build links to created bases for users.
    #[serde(default = "default_web_base_url")]
    pub web_base_url: String,

    /// Per-request timeout for platform calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl LarkConfig {
    /// Returns `(app_id, app_secret)` when both are configured and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.app_id.as_deref(), self.app_secret.as_deref()) {
            (Some(id), Some(secret)) if !id.trim().is_empty() && !secret.trim().is_empty() => {
                Some((id, secret))
            }
            _ => None,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl std::fmt::Debug for LarkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LarkConfig")
            .field("app_id", &self.app_id)
            .field("app_secret", &self.app_secret.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("web_base_url", &self.web_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for LarkConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            app_secret: None,
            base_url: default_base_url(),
            web_base_url: default_web_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://open.feishu.cn/open-apis".to_string()
}

fn default_web_base_url() -> String {
    "https://bytedance.feishu.cn".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Tenant token lifecycle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// A token is refreshed once it is within this many seconds of expiry.
    #[serde(default = "default_safety_margin_secs")]
    pub safety_margin_secs: u64,

    /// Upper bound on a single refresh; waiters are released with an error after it.
    #[serde(default = "default_refresh_timeout_secs")]
    pub refresh_timeout_secs: u64,
}

impl AuthConfig {
    pub fn safety_margin(&self) -> Duration {
        Duration::from_secs(self.safety_margin_secs)
    }

    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_secs(self.refresh_timeout_secs)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            safety_margin_secs: default_safety_margin_secs(),
            refresh_timeout_secs: default_refresh_timeout_secs(),
        }
    }
}

fn default_safety_margin_secs() -> u64 {
    300
}

fn default_refresh_timeout_secs() -> u64 {
    30
}

/// Fixed per-rule confidences of the intent classifier and the routing bands.
///
/// The values are categorical signals, not calibrated probabilities.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IntentConfig {
    #[serde(default = "default_help_confidence")]
    pub help: f32,

    /// Table request with a recognized template.
    #[serde(default = "default_template_table_confidence")]
    pub template_table: f32,

    /// Table request without a recognized template.
    #[serde(default = "default_generic_table_confidence")]
    pub generic_table: f32,

    #[serde(default = "default_action_confidence")]
    pub wiki: f32,

    #[serde(default = "default_action_confidence")]
    pub document: f32,

    #[serde(default = "default_action_confidence")]
    pub task: f32,

    #[serde(default = "default_search_confidence")]
    pub search: f32,

    /// At or above this confidence the command is executed directly.
    #[serde(default = "default_execute_threshold")]
    pub execute_threshold: f32,

    /// Below this confidence help is shown instead of acting.
    #[serde(default = "default_uncertain_threshold")]
    pub uncertain_threshold: f32,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            help: default_help_confidence(),
            template_table: default_template_table_confidence(),
            generic_table: default_generic_table_confidence(),
            wiki: default_action_confidence(),
            document: default_action_confidence(),
            task: default_action_confidence(),
            search: default_search_confidence(),
            execute_threshold: default_execute_threshold(),
            uncertain_threshold: default_uncertain_threshold(),
        }
    }
}

fn default_help_confidence() -> f32 {
    1.0
}

fn default_template_table_confidence() -> f32 {
    0.7
}

fn default_generic_table_confidence() -> f32 {
    0.4
}

fn default_action_confidence() -> f32 {
    0.6
}

fn default_search_confidence() -> f32 {
    0.5
}

fn default_execute_threshold() -> f32 {
    0.7
}

fn default_uncertain_threshold() -> f32 {
    0.3
}

/// HTTP gateway configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token required on `/tools` and `/call`. `None` leaves them open.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bearer_token: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_secrets() {
        let lark = LarkConfig {
            app_id: Some("cli_a1".into()),
            app_secret: Some("very-secret".into()),
            ..LarkConfig::default()
        };
        let out = format!("{lark:?}");
        assert!(out.contains("cli_a1"));
        assert!(!out.contains("very-secret"));

        let gateway = GatewayConfig {
            bearer_token: Some("gw-token".into()),
            ..GatewayConfig::default()
        };
        assert!(!format!("{gateway:?}").contains("gw-token"));
    }

    #[test]
    fn credentials_require_both_halves() {
        let mut lark = LarkConfig::default();
        assert!(lark.credentials().is_none());
        lark.app_id = Some("cli_a1".into());
        assert!(lark.credentials().is_none());
        lark.app_secret = Some("  ".into());
        assert!(lark.credentials().is_none());
        lark.app_secret = Some("s".into());
        assert_eq!(lark.credentials(), Some(("cli_a1", "s")));
    }

    #[test]
    fn intent_defaults_match_rule_table() {
        let intent = IntentConfig::default();
        assert_eq!(intent.help, 1.0);
        assert_eq!(intent.template_table, 0.7);
        assert_eq!(intent.generic_table, 0.4);
        assert_eq!(intent.wiki, 0.6);
        assert_eq!(intent.search, 0.5);
        assert!(intent.uncertain_threshold < intent.execute_threshold);
    }
}
