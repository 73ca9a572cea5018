// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tools that run the chat assistant.

use async_trait::async_trait;
use larkmaster_core::LarkError;
use serde::Deserialize;
use serde_json::{json, Value};

use super::ToolContext;
use crate::tool::{parse_args, to_output, Tool};

/// Handles a message exactly as the bot would, side effects included.
pub struct ProcessMessageTool {
    ctx: ToolContext,
}

impl ProcessMessageTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[derive(Deserialize)]
struct Args {
    message: String,
}

#[async_trait]
impl Tool for ProcessMessageTool {
    fn name(&self) -> &str {
        "process_lark_message"
    }

    fn description(&self) -> &str {
        "Process a natural-language message as the Lark bot would and run the resulting command"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "message": { "type": "string", "description": "The chat message" }
            },
            "required": ["message"]
        })
    }

    async fn invoke(&self, input: Value) -> Result<Value, LarkError> {
        let args: Args = parse_args(self.name(), input)?;
        let result = self.ctx.handler.handle_message(&args.message).await;
        to_output(&result)
    }
}

pub struct BotHelpTool {
    ctx: ToolContext,
}

impl BotHelpTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for BotHelpTool {
    fn name(&self) -> &str {
        "get_lark_bot_help"
    }

    fn description(&self) -> &str {
        "Return the bot's usage help and the available templates"
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn invoke(&self, _input: Value) -> Result<Value, LarkError> {
        let help = self.ctx.handler.help();
        Ok(json!({
            "help_text": help.message,
            "templates": help.data["templates"],
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::builtin::tests::context;
    use larkmaster_test_utils::MockPlatform;

    #[tokio::test]
    async fn process_runs_the_command() {
        let platform = Arc::new(MockPlatform::new());
        let tool = ProcessMessageTool::new(context(platform.clone()));
        let out = tool
            .invoke(json!({ "message": "タスクを追加: レビュー依頼" }))
            .await
            .unwrap();
        assert_eq!(out["success"], true);
        assert_eq!(out["command_type"], "create_task");
        let calls = platform.calls_to("create_task").await;
        assert_eq!(calls[0].params["title"], "レビュー依頼");
    }

    #[tokio::test]
    async fn help_has_text_and_templates() {
        let tool = BotHelpTool::new(context(Arc::new(MockPlatform::new())));
        let out = tool.invoke(Value::Null).await.unwrap();
        assert!(out["help_text"].as_str().unwrap().contains("Larkmaster"));
        assert_eq!(out["templates"].as_array().unwrap().len(), 8);
    }
}
