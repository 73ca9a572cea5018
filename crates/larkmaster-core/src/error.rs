// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Larkmaster workspace.
//!
//! Each layer has its own narrow error; [`LarkError`] is the umbrella used by
//! the tool, gateway, and binary layers.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Platform error codes meaning the bearer token itself was refused.
const TOKEN_REJECTION_CODES: &[i64] = &[99991661, 99991663, 99991668];

/// Failure to obtain a tenant access token.
///
/// `Clone` because a single refresh result is handed to every caller that
/// was waiting on it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// The issuer answered but refused the app credentials.
    #[error("token issuer rejected the app credentials ({code}): {message}")]
    Rejected { code: i64, message: String },

    /// The token request never produced a response.
    #[error("token request failed: {0}")]
    Transport(String),

    /// The issuer responded with something that is not a token.
    #[error("token response could not be read: {0}")]
    InvalidResponse(String),

    /// The refresh did not finish within the configured bound.
    #[error("token refresh timed out after {0:?}")]
    Timeout(Duration),

    /// The refresh task was aborted or panicked.
    #[error("token refresh was cancelled before completing")]
    Cancelled,
}

/// Failure of a single platform call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable credential could be obtained for the call.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Non-success HTTP status.
    #[error("HTTP {status} from {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The platform envelope carried a non-zero `code`.
    #[error("platform error {code} from {endpoint}: {message}")]
    Platform {
        endpoint: String,
        code: i64,
        message: String,
    },

    /// Connection, TLS, or timeout failure.
    #[error("request to {endpoint} failed: {message}")]
    Transport {
        endpoint: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Response body was not the expected JSON.
    #[error("invalid response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl ApiError {
    /// True when the platform refused the bearer token, so a fresh token may succeed.
    pub fn is_token_rejection(&self) -> bool {
        match self {
            ApiError::Platform { code, .. } => TOKEN_REJECTION_CODES.contains(code),
            ApiError::Status { status, .. } => *status == 401,
            _ => false,
        }
    }
}

/// A template name did not resolve against the catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("template not found: {name}")]
pub struct TemplateNotFound {
    pub name: String,
}

/// Rejected template registration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("template `{name}` is already registered")]
    DuplicateTemplate { name: String },

    #[error("keyword `{keyword}` of template `{template}` is already claimed by `{claimed_by}`")]
    DuplicateKeyword {
        keyword: String,
        template: String,
        claimed_by: String,
    },

    #[error("template `{template}` has an invalid field `{field}`: {reason}")]
    InvalidField {
        template: String,
        field: String,
        reason: String,
    },
}

/// Malformed input to the schema builder.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("table name is {len} characters, the limit is {max}")]
    NameTooLong { len: usize, max: usize },

    #[error("table name contains control characters")]
    InvalidNameCharacters,

    #[error("field `{name}` appears more than once")]
    DuplicateField { name: String },
}

/// A base was only partly created on the platform.
///
/// `created` and `missing` are in design order; the first entry of
/// `missing` is the field whose creation failed. `table_id` is `None` when
/// the table itself could not be created, in which case every field of it
/// is missing.
#[derive(Debug, Error)]
#[error(
    "table `{table}` partially created: {} field(s) created, {} missing",
    .created.len(),
    .missing.len()
)]
pub struct PartialCreationError {
    pub app_token: String,
    pub table: String,
    pub table_id: Option<String>,
    pub created: Vec<String>,
    pub missing: Vec<String>,
    #[source]
    pub source: ApiError,
}

impl PartialCreationError {
    /// Name of the field whose creation call failed.
    pub fn failed_field(&self) -> Option<&str> {
        self.missing.first().map(String::as_str)
    }

    /// Serializable view for callers that retry the missing part.
    pub fn details(&self) -> PartialCreationDetails<'_> {
        PartialCreationDetails {
            app_token: &self.app_token,
            table: &self.table,
            table_id: self.table_id.as_deref(),
            created: &self.created,
            missing: &self.missing,
            failed_field: self.failed_field(),
            cause: self.source.to_string(),
        }
    }
}

/// What a [`PartialCreationError`] left behind, as reported to callers.
#[derive(Debug, Serialize)]
pub struct PartialCreationDetails<'a> {
    pub app_token: &'a str,
    pub table: &'a str,
    pub table_id: Option<&'a str>,
    pub created: &'a [String],
    pub missing: &'a [String],
    pub failed_field: Option<&'a str>,
    pub cause: String,
}

/// The umbrella error used by the tool, gateway, and binary layers.
#[derive(Debug, Error)]
pub enum LarkError {
    /// Configuration errors (missing app credentials, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    TemplateNotFound(#[from] TemplateNotFound),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    PartialCreation(Box<PartialCreationError>),

    /// Tool arguments that do not match the tool's schema.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown tool: {name}")]
    ToolNotFound { name: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<PartialCreationError> for LarkError {
    fn from(err: PartialCreationError) -> Self {
        LarkError::PartialCreation(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_rejection_codes_are_recognised() {
        let rejected = ApiError::Platform {
            endpoint: "create_task".into(),
            code: 99991663,
            message: "invalid access token".into(),
        };
        assert!(rejected.is_token_rejection());

        let unrelated = ApiError::Platform {
            endpoint: "create_task".into(),
            code: 1254043,
            message: "permission denied".into(),
        };
        assert!(!unrelated.is_token_rejection());

        let unauthorized = ApiError::Status {
            endpoint: "create_task".into(),
            status: 401,
            body: String::new(),
        };
        assert!(unauthorized.is_token_rejection());
    }

    #[test]
    fn credential_error_is_cloneable_and_comparable() {
        let err = CredentialError::Rejected {
            code: 10003,
            message: "invalid app_secret".into(),
        };
        assert_eq!(err.clone(), err);
        assert!(err.to_string().contains("10003"));
    }

    #[test]
    fn partial_creation_message_counts_fields() {
        let err = PartialCreationError {
            app_token: "app".into(),
            table: "在庫管理".into(),
            table_id: Some("tbl".into()),
            created: vec!["商品名".into(), "SKU".into()],
            missing: vec!["カテゴリ".into()],
            source: ApiError::Decode {
                endpoint: "add_bitable_field".into(),
                message: "eof".into(),
            },
        };
        let text = err.to_string();
        assert!(text.contains("2 field(s) created"));
        assert!(text.contains("1 missing"));

        let details = serde_json::to_value(err.details()).unwrap();
        assert_eq!(details["table_id"], "tbl");
        assert_eq!(details["missing"], serde_json::json!(["カテゴリ"]));
        assert_eq!(details["failed_field"], "カテゴリ");
        assert!(details["cause"].as_str().unwrap().contains("eof"));
    }
}
