// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tenant token issuer backed by the Lark internal-app auth endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use larkmaster_config::LarkConfig;
use larkmaster_core::{AccessToken, CredentialError, IssuedToken, LarkError, TokenIssuer};

const TOKEN_PATH: &str = "/auth/v3/tenant_access_token/internal";

#[derive(Serialize)]
struct TokenRequest<'a> {
    app_id: &'a str,
    app_secret: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    tenant_access_token: Option<String>,
    /// Lifetime in seconds.
    expire: Option<u64>,
}

/// Exchanges app credentials for a tenant access token, one request per call.
#[derive(Clone)]
pub struct TenantTokenIssuer {
    client: reqwest::Client,
    url: String,
    app_id: String,
    app_secret: String,
}

impl TenantTokenIssuer {
    pub fn new(
        base_url: &str,
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LarkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LarkError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: format!("{}{TOKEN_PATH}", base_url.trim_end_matches('/')),
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        })
    }

    /// Builds the issuer from `[lark]`, failing when the app credentials are absent.
    pub fn from_config(config: &LarkConfig) -> Result<Self, LarkError> {
        let (app_id, app_secret) = config.credentials().ok_or_else(|| {
            LarkError::Config(
                "lark.app_id and lark.app_secret (or LARK_APP_ID / LARK_APP_SECRET) are required"
                    .to_string(),
            )
        })?;
        Self::new(&config.base_url, app_id, app_secret, config.request_timeout())
    }
}

impl std::fmt::Debug for TenantTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantTokenIssuer")
            .field("url", &self.url)
            .field("app_id", &self.app_id)
            .field("app_secret", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl TokenIssuer for TenantTokenIssuer {
    async fn issue(&self) -> Result<IssuedToken, CredentialError> {
        let response = self
            .client
            .post(&self.url)
            .json(&TokenRequest {
                app_id: &self.app_id,
                app_secret: &self.app_secret,
            })
            .send()
            .await
            .map_err(|e| CredentialError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CredentialError::Transport(e.to_string()))?;
        debug!(status = %status, "tenant token response received");

        let parsed: TokenResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(CredentialError::Transport(format!("HTTP {status}: {body}")));
            }
            Err(e) => return Err(CredentialError::InvalidResponse(e.to_string())),
        };

        if parsed.code != 0 {
            return Err(CredentialError::Rejected {
                code: parsed.code,
                message: parsed.msg,
            });
        }

        match (parsed.tenant_access_token, parsed.expire) {
            (Some(token), Some(expire)) if !token.is_empty() => Ok(IssuedToken {
                token: AccessToken::new(token),
                expires_in: Duration::from_secs(expire),
            }),
            _ => Err(CredentialError::InvalidResponse(
                "response has no tenant_access_token or expire".to_string(),
            )),
        }
    }
}
