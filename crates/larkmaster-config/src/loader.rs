// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./larkmaster.toml` > `~/.config/larkmaster/larkmaster.toml`
//! > `/etc/larkmaster/larkmaster.toml`, with `LARKMASTER_*` overrides and the
//! conventional `LARK_APP_ID` / `LARK_APP_SECRET` variables on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::LarkmasterConfig;

pub(crate) const LOCAL_CONFIG: &str = "larkmaster.toml";
pub(crate) const SYSTEM_CONFIG: &str = "/etc/larkmaster/larkmaster.toml";

pub(crate) fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("larkmaster/larkmaster.toml"))
        .unwrap_or_default()
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/larkmaster/larkmaster.toml`
/// 3. `~/.config/larkmaster/larkmaster.toml`
/// 4. `./larkmaster.toml`
/// 5. `LARKMASTER_*` environment variables
/// 6. `LARK_APP_ID` / `LARK_APP_SECRET`
pub fn load_config() -> Result<LarkmasterConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<LarkmasterConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LarkmasterConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LarkmasterConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LarkmasterConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .merge(lark_env_provider())
        .extract()
}

/// Build the Figment used for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LarkmasterConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
        .merge(lark_env_provider())
}

/// `LARKMASTER_*` variables with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `LARKMASTER_LARK_APP_SECRET` must map to `lark.app_secret`.
fn env_provider() -> Env {
    Env::prefixed("LARKMASTER_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("agent_", "agent.", 1)
            .replacen("lark_", "lark.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("intent_", "intent.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}

/// The unprefixed variables Lark tooling conventionally uses.
fn lark_env_provider() -> Env {
    Env::raw()
        .only(&["LARK_APP_ID", "LARK_APP_SECRET"])
        .map(|key| match key.as_str().to_ascii_lowercase().as_str() {
            "lark_app_id" => "lark.app_id".into(),
            _ => "lark.app_secret".into(),
        })
}
