// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in Lark tools.
//!
//! All tools share one [`ToolContext`]: the catalog, classifier, builder,
//! provisioner and message handler wired to a single platform client.

pub mod assistant;
pub mod bitable;
pub mod intent;

pub use assistant::{BotHelpTool, ProcessMessageTool};
pub use bitable::{
    BuildWithWikiTool, DesignBitableTool, GenerateDocumentationTool, ListTemplatesTool,
    ResumeBuildTool, SmartBuildTool,
};
pub use intent::AnalyzeIntentTool;

use std::sync::Arc;

use larkmaster_assistant::MessageHandler;
use larkmaster_bitable::{
    BitableProvisioner, DocumentationGenerator, SchemaBuilder, TableDesign, TemplateCatalog,
};
use larkmaster_config::IntentConfig;
use larkmaster_core::{IntentResult, LarkError, PlatformApi};
use larkmaster_intent::{IntentClassifier, RoutingPolicy};
use serde_json::{json, Value};

use crate::ToolRegistry;

/// Shared collaborators for the built-in tools.
#[derive(Clone)]
pub struct ToolContext {
    catalog: Arc<TemplateCatalog>,
    classifier: Arc<IntentClassifier>,
    policy: RoutingPolicy,
    builder: Arc<SchemaBuilder>,
    docs: DocumentationGenerator,
    provisioner: Arc<BitableProvisioner>,
    handler: Arc<MessageHandler>,
}

impl ToolContext {
    pub fn new(
        platform: Arc<dyn PlatformApi>,
        catalog: Arc<TemplateCatalog>,
        intent: &IntentConfig,
        web_base_url: &str,
    ) -> Self {
        Self {
            classifier: Arc::new(IntentClassifier::from_config(catalog.clone(), intent)),
            policy: RoutingPolicy::from(intent),
            builder: Arc::new(SchemaBuilder::new(catalog.clone())),
            docs: DocumentationGenerator::new(),
            provisioner: Arc::new(BitableProvisioner::new(platform.clone(), web_base_url)),
            handler: Arc::new(MessageHandler::new(
                platform,
                catalog.clone(),
                intent,
                web_base_url,
            )),
            catalog,
        }
    }

    pub fn catalog(&self) -> &Arc<TemplateCatalog> {
        &self.catalog
    }

    /// The message handler the tools and the bot webhook share.
    pub fn handler(&self) -> &Arc<MessageHandler> {
        &self.handler
    }

    /// Classifies `message` as a table request and builds a design from it.
    pub fn design(
        &self,
        message: &str,
        name: Option<&str>,
    ) -> Result<(IntentResult, TableDesign), LarkError> {
        let intent = self.classifier.classify_table(message);
        let design = self.builder.build(&intent, name)?;
        Ok((intent, design))
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("templates", &self.catalog.len())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// JSON Schema for tools taking a message plus an optional base name.
pub(crate) fn message_schema(message: &str, with_folder: bool) -> Value {
    let mut schema = json!({
        "type": "object",
        "properties": {
            "message": { "type": "string", "description": message },
            "name": { "type": "string", "description": "Base name; derived from the message when omitted" }
        },
        "required": ["message"]
    });
    if with_folder {
        schema["properties"]["folder_token"] = json!({
            "type": "string",
            "description": "Drive folder to create the base in"
        });
    }
    schema
}

/// Registers every built-in tool.
pub fn register_builtins(registry: &mut ToolRegistry, ctx: &ToolContext) {
    registry.register(Arc::new(AnalyzeIntentTool::new(ctx.clone())));
    registry.register(Arc::new(ListTemplatesTool::new(ctx.clone())));
    registry.register(Arc::new(DesignBitableTool::new(ctx.clone())));
    registry.register(Arc::new(GenerateDocumentationTool::new(ctx.clone())));
    registry.register(Arc::new(SmartBuildTool::new(ctx.clone())));
    registry.register(Arc::new(BuildWithWikiTool::new(ctx.clone())));
    registry.register(Arc::new(ResumeBuildTool::new(ctx.clone())));
    registry.register(Arc::new(ProcessMessageTool::new(ctx.clone())));
    registry.register(Arc::new(BotHelpTool::new(ctx.clone())));
}
