// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classify, dispatch, reply.
//!
//! Platform failures become unsuccessful [`CommandResult`]s carrying the
//! error text; they are logged here and never propagated.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};

use larkmaster_bitable::{BitableProvisioner, SchemaBuilder, TemplateCatalog};
use larkmaster_config::IntentConfig;
use larkmaster_core::{CommandType, Endpoint, IntentResult, LarkError, PlatformApi};
use larkmaster_intent::{ConfidenceBand, IntentClassifier, RoutingPolicy};

use crate::replies;

const DEFAULT_WIKI_NAME: &str = "ナレッジベース";
const DEFAULT_DOCUMENT_TITLE: &str = "新規ドキュメント";
const TASK_TITLE_CHARS: usize = 50;
const SEARCH_RESULTS_SHOWN: usize = 5;

/// Outcome of handling one chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResult {
    pub success: bool,
    pub command_type: CommandType,
    /// Reply text for the user.
    pub message: String,
    pub data: Value,
    /// The command ran although its confidence was below the execute threshold.
    pub uncertain: bool,
}

impl CommandResult {
    fn ok(command_type: CommandType, message: String, data: Value) -> Self {
        Self {
            success: true,
            command_type,
            message,
            data,
            uncertain: false,
        }
    }

    /// A partial creation also reports what exists, so the missing part can
    /// be retried.
    fn failed(command_type: CommandType, action: &str, err: &LarkError) -> Self {
        error!(command = %command_type, error = %err, "command failed");
        let mut data = json!({ "error": err.to_string() });
        let message = match err {
            LarkError::PartialCreation(partial) => {
                data["partial"] = serde_json::to_value(partial.details()).unwrap_or_default();
                replies::partially_created(action, partial)
            }
            _ => replies::failed(action, err),
        };
        Self {
            success: false,
            command_type,
            message,
            data,
            uncertain: false,
        }
    }
}

pub struct MessageHandler {
    classifier: IntentClassifier,
    policy: RoutingPolicy,
    builder: SchemaBuilder,
    provisioner: BitableProvisioner,
    platform: Arc<dyn PlatformApi>,
    catalog: Arc<TemplateCatalog>,
}

impl MessageHandler {
    pub fn new(
        platform: Arc<dyn PlatformApi>,
        catalog: Arc<TemplateCatalog>,
        intent: &IntentConfig,
        web_base_url: &str,
    ) -> Self {
        Self {
            classifier: IntentClassifier::from_config(catalog.clone(), intent),
            policy: RoutingPolicy::from(intent),
            builder: SchemaBuilder::new(catalog.clone()),
            provisioner: BitableProvisioner::new(platform.clone(), web_base_url),
            platform,
            catalog,
        }
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub async fn handle_message(&self, text: &str) -> CommandResult {
        let intent = self.classifier.classify(text);
        let band = self.policy.band(&intent);
        info!(
            command = %intent.command_type(),
            confidence = intent.confidence(),
            band = %band,
            "handling message"
        );

        if band == ConfidenceBand::Clarify {
            return CommandResult::ok(
                intent.command_type(),
                replies::conversation(intent.raw_message()),
                json!({ "original_message": intent.raw_message() }),
            );
        }

        let mut result = self.dispatch(&intent).await;
        if band == ConfidenceBand::Uncertain {
            result.uncertain = true;
            if result.success {
                result.message.push_str(replies::UNCERTAIN_NOTE);
            }
        }
        result
    }

    async fn dispatch(&self, intent: &IntentResult) -> CommandResult {
        match intent.command_type() {
            CommandType::Help => self.help(),
            CommandType::CreateBitable => self.create_bitable(intent).await,
            CommandType::CreateWiki => self.create_wiki(intent).await,
            CommandType::CreateDocument => self.create_document(intent).await,
            CommandType::CreateTask => self.create_task(intent).await,
            CommandType::Search => self.search(intent).await,
            CommandType::Unknown => CommandResult::ok(
                CommandType::Unknown,
                replies::conversation(intent.raw_message()),
                json!({ "original_message": intent.raw_message() }),
            ),
        }
    }

    pub fn help(&self) -> CommandResult {
        let templates: Vec<&str> = self.catalog.names().collect();
        CommandResult::ok(
            CommandType::Help,
            replies::help(&self.catalog),
            json!({ "templates": templates }),
        )
    }

    async fn create_bitable(&self, intent: &IntentResult) -> CommandResult {
        const ACTION: &str = "Bitable作成";
        let design = match self.builder.build(intent, None) {
            Ok(design) => design,
            Err(e) => return CommandResult::failed(CommandType::CreateBitable, ACTION, &e.into()),
        };
        match self.provisioner.provision(&design, None).await {
            Ok(base) => CommandResult::ok(
                CommandType::CreateBitable,
                replies::bitable_created(&design, &base),
                json!({ "design": design, "base": base }),
            ),
            Err(e) => CommandResult::failed(CommandType::CreateBitable, ACTION, &e),
        }
    }

    async fn create_wiki(&self, intent: &IntentResult) -> CommandResult {
        let params = intent.parameters();
        let name = params.name.as_deref().unwrap_or(DEFAULT_WIKI_NAME);
        let body = json!({
            "name": name,
            "description": params.description.as_deref().unwrap_or_default(),
        });
        match self.platform.invoke(Endpoint::CreateWikiSpace, body).await {
            Ok(data) => {
                let space_id = data["space"]["space_id"].as_str().unwrap_or_default();
                CommandResult::ok(
                    CommandType::CreateWiki,
                    format!(
                        "✅ Wikiスペースを作成しました！\n\n**スペース名:** {name}\n**スペースID:** {space_id}"
                    ),
                    data,
                )
            }
            Err(e) => CommandResult::failed(CommandType::CreateWiki, "Wiki作成", &e.into()),
        }
    }

    async fn create_document(&self, intent: &IntentResult) -> CommandResult {
        let title = intent
            .parameters()
            .name
            .as_deref()
            .unwrap_or(DEFAULT_DOCUMENT_TITLE);
        match self
            .platform
            .invoke(Endpoint::CreateDocument, json!({ "title": title }))
            .await
        {
            Ok(data) => {
                let document_id = data["document"]["document_id"].as_str().unwrap_or_default();
                CommandResult::ok(
                    CommandType::CreateDocument,
                    format!(
                        "✅ ドキュメントを作成しました！\n\n**タイトル:** {title}\n**ドキュメントID:** {document_id}"
                    ),
                    data,
                )
            }
            Err(e) => {
                CommandResult::failed(CommandType::CreateDocument, "ドキュメント作成", &e.into())
            }
        }
    }

    async fn create_task(&self, intent: &IntentResult) -> CommandResult {
        let params = intent.parameters();
        let title = match params.title.as_deref().filter(|t| !t.is_empty()) {
            Some(title) => title.to_string(),
            None => intent.raw_message().chars().take(TASK_TITLE_CHARS).collect(),
        };
        let body = json!({
            "title": title,
            "description": params.description.as_deref().unwrap_or_default(),
        });
        match self.platform.invoke(Endpoint::CreateTask, body).await {
            Ok(data) => {
                let task_id = data["task"]["id"].as_str().unwrap_or_default();
                CommandResult::ok(
                    CommandType::CreateTask,
                    format!("✅ タスクを作成しました！\n\n**タイトル:** {title}\n**タスクID:** {task_id}"),
                    data,
                )
            }
            Err(e) => CommandResult::failed(CommandType::CreateTask, "タスク作成", &e.into()),
        }
    }

    async fn search(&self, intent: &IntentResult) -> CommandResult {
        let query = intent
            .parameters()
            .query
            .as_deref()
            .filter(|q| !q.is_empty())
            .unwrap_or(intent.raw_message());
        match self
            .platform
            .invoke(Endpoint::SearchDocuments, json!({ "search_key": query }))
            .await
        {
            Ok(data) => {
                let docs = data["docs_entities"].as_array().map(Vec::as_slice).unwrap_or_default();
                let message = if docs.is_empty() {
                    "検索結果が見つかりませんでした。".to_string()
                } else {
                    let mut text = format!("🔍 検索結果: {}件\n\n", docs.len());
                    for doc in docs.iter().take(SEARCH_RESULTS_SHOWN) {
                        text.push_str(&format!("• {}\n", doc["title"].as_str().unwrap_or("N/A")));
                    }
                    text
                };
                CommandResult::ok(CommandType::Search, message, data)
            }
            Err(e) => CommandResult::failed(CommandType::Search, "検索", &e.into()),
        }
    }
}

impl std::fmt::Debug for MessageHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageHandler")
            .field("policy", &self.policy)
            .field("templates", &self.catalog.len())
            .finish_non_exhaustive()
    }
}
