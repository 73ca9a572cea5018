// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Lark Open Platform.
//!
//! Every call carries a bearer token from the [`CredentialManager`]. The
//! response envelope `{code, msg, data}` is unwrapped here: `data` is
//! returned on `code == 0`, anything else becomes an [`ApiError`]. When the
//! platform refuses the token itself the credential is invalidated and the
//! call is retried once with a fresh one.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use larkmaster_auth::CredentialManager;
use larkmaster_config::LarkConfig;
use larkmaster_core::{AccessToken, ApiError, Endpoint, HttpMethod, LarkError, PlatformApi};

#[derive(Deserialize)]
struct Envelope {
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Clone)]
pub struct LarkClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialManager>,
}

impl LarkClient {
    pub fn new(
        base_url: &str,
        credentials: Arc<CredentialManager>,
        timeout: Duration,
    ) -> Result<Self, LarkError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LarkError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn from_config(config: &LarkConfig, credentials: Arc<CredentialManager>) -> Result<Self, LarkError> {
        Self::new(&config.base_url, credentials, config.request_timeout())
    }

    async fn send(
        &self,
        endpoint: &Endpoint,
        params: &Value,
        token: &AccessToken,
    ) -> Result<Value, ApiError> {
        let id = endpoint.id();
        let url = format!("{}{}", self.base_url, endpoint.path());
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token.expose())).map_err(|e| {
            ApiError::Transport {
                endpoint: id.to_string(),
                message: "token is not a valid header value".to_string(),
                source: Some(Box::new(e)),
            }
        })?;

        let request = match endpoint.method() {
            HttpMethod::Get => {
                let request = self.http.get(&url);
                if params.is_null() {
                    request
                } else {
                    request.query(params)
                }
            }
            HttpMethod::Post => self.http.post(&url).json(params),
            HttpMethod::Patch => self.http.patch(&url).json(params),
        };

        let response = request
            .header(AUTHORIZATION, bearer)
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                endpoint: id.to_string(),
                message: e.to_string(),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Transport {
            endpoint: id.to_string(),
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(endpoint = id, status = %status, "platform response received");

        let envelope = match serde_json::from_str::<Envelope>(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(ApiError::Status {
                    endpoint: id.to_string(),
                    status: status.as_u16(),
                    body,
                });
            }
            Err(e) => {
                return Err(ApiError::Decode {
                    endpoint: id.to_string(),
                    message: e.to_string(),
                });
            }
        };

        if envelope.code != 0 {
            return Err(ApiError::Platform {
                endpoint: id.to_string(),
                code: envelope.code,
                message: envelope.msg,
            });
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: id.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(envelope.data.unwrap_or_else(|| Value::Object(Default::default())))
    }
}

impl std::fmt::Debug for LarkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LarkClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PlatformApi for LarkClient {
    async fn invoke(&self, endpoint: Endpoint, params: Value) -> Result<Value, ApiError> {
        let token = self.credentials.get_valid_token().await?;
        match self.send(&endpoint, &params, &token).await {
            Err(e) if e.is_token_rejection() => {
                warn!(endpoint = endpoint.id(), error = %e, "token rejected, refreshing and retrying once");
                self.credentials.invalidate_token(&token).await;
                let fresh = self.credentials.get_valid_token().await?;
                self.send(&endpoint, &params, &fresh).await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larkmaster_core::CredentialError;
    use larkmaster_test_utils::{IssueStep, MockIssuer};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, issuer: MockIssuer) -> LarkClient {
        let manager = Arc::new(CredentialManager::new(
            Arc::new(issuer),
            Duration::from_secs(300),
            Duration::from_secs(5),
        ));
        LarkClient::new(&server.uri(), manager, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn posts_json_with_bearer_and_unwraps_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/task/v1/tasks"))
            .and(header("authorization", "Bearer mock-token-1"))
            .and(body_json(json!({"title": "レビュー依頼"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "msg": "success",
                "data": {"task": {"id": "t1"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let data = client(&server, MockIssuer::new())
            .invoke(Endpoint::CreateTask, json!({"title": "レビュー依頼"}))
            .await
            .unwrap();
        assert_eq!(data["task"]["id"], "t1");
    }

    #[tokio::test]
    async fn search_sends_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/suite/docs-api/search/object"))
            .and(query_param("search_key", "予算"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "data": {"docs_entities": [], "has_more": false}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let data = client(&server, MockIssuer::new())
            .invoke(Endpoint::SearchDocuments, json!({"search_key": "予算"}))
            .await
            .unwrap();
        assert_eq!(data["has_more"], false);
    }

    #[tokio::test]
    async fn non_zero_code_is_platform_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 1254043,
                "msg": "permission denied"
            })))
            .mount(&server)
            .await;

        let err = client(&server, MockIssuer::new())
            .invoke(Endpoint::CreateBitableApp, json!({"name": "x"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Platform { code: 1254043, .. }));
    }

    #[tokio::test]
    async fn rejected_token_is_refreshed_and_retried_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer mock-token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 99991663,
                "msg": "invalid access token"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer mock-token-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "data": {"document": {"document_id": "d1"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let data = client(&server, MockIssuer::new())
            .invoke(Endpoint::CreateDocument, json!({"title": "議事録"}))
            .await
            .unwrap();
        assert_eq!(data["document"]["document_id"], "d1");
    }

    #[tokio::test]
    async fn plain_http_failure_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let err = client(&server, MockIssuer::new())
            .invoke(Endpoint::CreateWikiSpace, json!({"name": "n"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn credential_failure_skips_the_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let issuer = MockIssuer::new().with_steps([IssueStep::Fail(CredentialError::Transport(
            "dns".into(),
        ))]);
        let err = client(&server, issuer)
            .invoke(Endpoint::CreateTask, json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Credential(CredentialError::Transport(_))));
    }
}
