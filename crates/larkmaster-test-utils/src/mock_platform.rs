// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory platform for provisioning and assistant tests.
//!
//! Every call is recorded in order. Responses come from a per-endpoint
//! script when one is queued, otherwise from a canned success payload shaped
//! like the real `data` object of that endpoint.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use larkmaster_core::{ApiError, Endpoint, PlatformApi};

/// One observed `invoke` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: Endpoint,
    pub params: Value,
}

enum Scripted {
    Canned,
    Respond(Value),
    Fail(ApiError),
}

pub struct MockPlatform {
    calls: Mutex<Vec<RecordedCall>>,
    script: Mutex<HashMap<&'static str, VecDeque<Scripted>>>,
    seq: AtomicUsize,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(HashMap::new()),
            seq: AtomicUsize::new(0),
        }
    }

    /// Queue an explicit `data` payload for the next call to `endpoint_id`.
    pub async fn respond(&self, endpoint_id: &'static str, data: Value) {
        self.push(endpoint_id, Scripted::Respond(data)).await;
    }

    /// Queue a failure for the next call to `endpoint_id`.
    pub async fn fail(&self, endpoint_id: &'static str, err: ApiError) {
        self.push(endpoint_id, Scripted::Fail(err)).await;
    }

    /// Let `successes` calls to `endpoint_id` succeed, then fail the next one.
    pub async fn fail_after(&self, endpoint_id: &'static str, successes: usize, err: ApiError) {
        for _ in 0..successes {
            self.push(endpoint_id, Scripted::Canned).await;
        }
        self.push(endpoint_id, Scripted::Fail(err)).await;
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    /// Endpoint ids in call order.
    pub async fn call_ids(&self) -> Vec<&'static str> {
        self.calls
            .lock()
            .await
            .iter()
            .map(|c| c.endpoint.id())
            .collect()
    }

    pub async fn calls_to(&self, endpoint_id: &str) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.endpoint.id() == endpoint_id)
            .cloned()
            .collect()
    }

    async fn push(&self, endpoint_id: &'static str, step: Scripted) {
        self.script
            .lock()
            .await
            .entry(endpoint_id)
            .or_default()
            .push_back(step);
    }

    fn canned(&self, endpoint: &Endpoint, params: &Value) -> Value {
        let n = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        match endpoint {
            Endpoint::CreateBitableApp => json!({
                "app": {
                    "app_token": format!("bascnMock{n}"),
                    "name": params["name"],
                    "url": format!("https://mock.feishu.cn/base/bascnMock{n}"),
                }
            }),
            Endpoint::CreateBitableTable { .. } => json!({
                "table_id": format!("tblMock{n}"),
                "default_view_id": format!("vewMock{n}"),
                "field_id_list": [format!("fldMock{n}")],
            }),
            Endpoint::AddBitableField { .. } => json!({
                "field": {
                    "field_id": format!("fldMock{n}"),
                    "field_name": params["field_name"],
                    "type": params["type"],
                }
            }),
            Endpoint::CreateWikiSpace => json!({
                "space": { "space_id": format!("spaceMock{n}"), "name": params["name"] }
            }),
            Endpoint::CreateWikiPage { .. } => json!({
                "node": { "node_token": format!("wikMock{n}"), "title": params["title"] }
            }),
            Endpoint::CreateDocument => json!({
                "document": { "document_id": format!("doxMock{n}"), "title": params["title"] }
            }),
            Endpoint::CreateTask => json!({
                "task": { "id": format!("taskMock{n}"), "title": params["title"] }
            }),
            Endpoint::SearchDocuments => json!({ "docs_entities": [], "has_more": false }),
            Endpoint::SendMessage => json!({ "message_id": format!("om_mock{n}") }),
        }
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformApi for MockPlatform {
    async fn invoke(&self, endpoint: Endpoint, params: Value) -> Result<Value, ApiError> {
        self.calls.lock().await.push(RecordedCall {
            endpoint: endpoint.clone(),
            params: params.clone(),
        });

        let step = self
            .script
            .lock()
            .await
            .get_mut(endpoint.id())
            .and_then(VecDeque::pop_front)
            .unwrap_or(Scripted::Canned);

        match step {
            Scripted::Canned => Ok(self.canned(&endpoint, &params)),
            Scripted::Respond(data) => Ok(data),
            Scripted::Fail(err) => Err(err),
        }
    }
}
