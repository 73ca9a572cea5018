// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types exchanged across the platform and credential seams.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// An opaque bearer token.
///
/// Cheap to clone; `Debug` output never contains the token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Arc<str>);

impl AccessToken {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for use in an `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Scope of a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    /// Organization-wide app installation token.
    Tenant,
}

/// A token as handed out by the issuer, before the manager stamps an expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: AccessToken,
    /// Lifetime reported by the issuer, relative to the moment of issue.
    pub expires_in: Duration,
}

/// HTTP method of a platform endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
}

/// The platform operations the assistant and composite tools call.
///
/// Path parameters are carried in the variant; body or query parameters are
/// passed separately to [`crate::PlatformApi::invoke`].
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Endpoint {
    CreateBitableApp,
    CreateBitableTable { app_token: String },
    AddBitableField { app_token: String, table_id: String },
    CreateWikiSpace,
    CreateWikiPage { space_id: String },
    CreateDocument,
    CreateTask,
    SearchDocuments,
    SendMessage,
}

impl Endpoint {
    /// Stable identifier used in logs and error messages.
    pub fn id(&self) -> &'static str {
        self.into()
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::SearchDocuments => HttpMethod::Get,
            _ => HttpMethod::Post,
        }
    }

    /// Path relative to the `open-apis` base URL.
    pub fn path(&self) -> String {
        match self {
            Endpoint::CreateBitableApp => "/bitable/v1/apps".to_string(),
            Endpoint::CreateBitableTable { app_token } => {
                format!("/bitable/v1/apps/{app_token}/tables")
            }
            Endpoint::AddBitableField {
                app_token,
                table_id,
            } => format!("/bitable/v1/apps/{app_token}/tables/{table_id}/fields"),
            Endpoint::CreateWikiSpace => "/wiki/v2/spaces".to_string(),
            Endpoint::CreateWikiPage { space_id } => format!("/wiki/v2/spaces/{space_id}/pages"),
            Endpoint::CreateDocument => "/docx/v1/documents".to_string(),
            Endpoint::CreateTask => "/task/v1/tasks".to_string(),
            Endpoint::SearchDocuments => "/suite/docs-api/search/object".to_string(),
            Endpoint::SendMessage => "/im/v1/messages?receive_id_type=chat_id".to_string(),
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("t-secret-value");
        let debug = format!("{token:?}");
        assert!(!debug.contains("secret"));
        assert_eq!(token.expose(), "t-secret-value");
    }

    #[test]
    fn endpoint_paths_embed_path_parameters() {
        let ep = Endpoint::AddBitableField {
            app_token: "bascn1".into(),
            table_id: "tbl9".into(),
        };
        assert_eq!(ep.path(), "/bitable/v1/apps/bascn1/tables/tbl9/fields");
        assert_eq!(ep.id(), "add_bitable_field");
        assert_eq!(ep.method(), HttpMethod::Post);
    }

    #[test]
    fn search_is_a_get() {
        assert_eq!(Endpoint::SearchDocuments.method(), HttpMethod::Get);
        assert_eq!(Endpoint::SearchDocuments.to_string(), "search_documents");
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
    }

    #[test]
    fn credential_kind_round_trips_through_strum() {
        use std::str::FromStr;
        assert_eq!(CredentialKind::Tenant.to_string(), "tenant");
        assert_eq!(
            CredentialKind::from_str("tenant").expect("should parse"),
            CredentialKind::Tenant
        );
    }
}
