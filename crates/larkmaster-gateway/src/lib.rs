// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Larkmaster.
//!
//! Serves the tool registry over `GET /tools` and `POST /call`, and bot
//! event deliveries over `POST /webhook`.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use handlers::{CallRequest, CallResponse, HealthResponse};
pub use server::{router, start_server, GatewayState, ServerConfig};
