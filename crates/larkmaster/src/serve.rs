// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `larkmaster serve` command implementation.
//!
//! Wires the tenant credential manager, the platform client, the tool
//! registry and the bot event handler into the HTTP gateway, and serves
//! until Ctrl-C.

use std::sync::Arc;

use larkmaster_assistant::BotEventHandler;
use larkmaster_auth::{CredentialManager, TenantTokenIssuer};
use larkmaster_bitable::TemplateCatalog;
use larkmaster_client::LarkClient;
use larkmaster_config::LarkmasterConfig;
use larkmaster_core::{LarkError, PlatformApi};
use larkmaster_gateway::{start_server, AuthConfig, GatewayState, ServerConfig};
use larkmaster_tools::{register_builtins, ToolContext, ToolRegistry};
use tracing::info;

pub async fn run_serve(config: LarkmasterConfig) -> Result<(), LarkError> {
    let issuer = Arc::new(TenantTokenIssuer::from_config(&config.lark)?);
    let credentials = Arc::new(CredentialManager::from_config(issuer, &config.auth));
    let platform: Arc<dyn PlatformApi> =
        Arc::new(LarkClient::from_config(&config.lark, credentials)?);

    let catalog = Arc::new(TemplateCatalog::builtin());
    let ctx = ToolContext::new(
        platform.clone(),
        catalog,
        &config.intent,
        &config.lark.web_base_url,
    );
    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry, &ctx);
    info!(tools = registry.len(), templates = ctx.catalog().len(), "tools registered");

    let events = Arc::new(BotEventHandler::new(ctx.handler().clone(), platform));
    let state = GatewayState::new(
        Arc::new(registry),
        events,
        AuthConfig {
            bearer_token: config.gateway.bearer_token.clone(),
        },
    );
    let server = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    info!(agent = %config.agent.name, "larkmaster serve starting");
    start_server(&server, state, shutdown_signal()).await?;
    info!("larkmaster serve shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// `larkmaster={level},warn` unless `RUST_LOG` is set.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("larkmaster={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
