// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential-issuing collaborator.

use async_trait::async_trait;

use crate::error::CredentialError;
use crate::types::IssuedToken;

/// Exchanges the app's credentials for a fresh tenant access token.
///
/// Implementations perform exactly one network round-trip per call and do
/// not cache; caching and deduplication belong to the credential manager.
#[async_trait]
pub trait TokenIssuer: Send + Sync + 'static {
    async fn issue(&self) -> Result<IssuedToken, CredentialError>;
}
