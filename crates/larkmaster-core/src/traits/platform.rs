// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The platform capability every outbound call goes through.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::Endpoint;

/// Invokes one platform endpoint with JSON parameters.
///
/// On success the envelope's `data` object is returned; a non-zero platform
/// `code` is an [`ApiError::Platform`]. Authentication is the
/// implementation's concern.
#[async_trait]
pub trait PlatformApi: Send + Sync + 'static {
    async fn invoke(
        &self,
        endpoint: Endpoint,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, ApiError>;
}
