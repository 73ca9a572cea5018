// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Handles GET /health, GET /tools, POST /call, POST /webhook.

use axum::{extract::State, http::StatusCode, Json};
use larkmaster_core::LarkError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub tools: usize,
}

/// Request body for POST /call.
#[derive(Debug, Deserialize)]
pub struct CallRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Response body for POST /call.
#[derive(Debug, Serialize)]
pub struct CallResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// What a partially created base left behind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<Value>,
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        tools: state.registry.len(),
    })
}

/// GET /tools
pub async fn get_tools(State(state): State<GatewayState>) -> Json<Value> {
    Json(serde_json::json!({ "tools": state.registry.tool_definitions() }))
}

/// POST /call
///
/// Tool failures are reported in the body with `success: false`; the status
/// code distinguishes caller mistakes from platform failures.
pub async fn post_call(
    State(state): State<GatewayState>,
    Json(body): Json<CallRequest>,
) -> (StatusCode, Json<CallResponse>) {
    let arguments = if body.arguments.is_null() {
        Value::Object(Default::default())
    } else {
        body.arguments
    };

    match state.registry.call(&body.name, arguments).await {
        Ok(result) => (
            StatusCode::OK,
            Json(CallResponse {
                success: true,
                result: Some(result),
                error: None,
                partial: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(tool = %body.name, error = %e, "tool call failed");
            let partial = match &e {
                LarkError::PartialCreation(p) => serde_json::to_value(p.details()).ok(),
                _ => None,
            };
            (
                status_for(&e),
                Json(CallResponse {
                    success: false,
                    result: None,
                    error: Some(e.to_string()),
                    partial,
                }),
            )
        }
    }
}

/// POST /webhook
pub async fn post_webhook(
    State(state): State<GatewayState>,
    Json(payload): Json<Value>,
) -> Json<Value> {
    Json(state.events.handle_event(&payload).await)
}

fn status_for(err: &LarkError) -> StatusCode {
    match err {
        LarkError::ToolNotFound { .. } => StatusCode::NOT_FOUND,
        LarkError::InvalidInput(_) | LarkError::Build(_) | LarkError::TemplateNotFound(_) => {
            StatusCode::BAD_REQUEST
        }
        LarkError::Api(_) | LarkError::Credential(_) | LarkError::PartialCreation(_) => {
            StatusCode::BAD_GATEWAY
        }
        LarkError::Config(_) | LarkError::Catalog(_) | LarkError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
