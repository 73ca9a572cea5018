// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent analysis without side effects.

use async_trait::async_trait;
use larkmaster_core::LarkError;
use serde::Deserialize;
use serde_json::{json, Value};

use super::ToolContext;
use crate::tool::{parse_args, Tool};

pub struct AnalyzeIntentTool {
    ctx: ToolContext,
}

impl AnalyzeIntentTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[derive(Deserialize)]
struct Args {
    message: String,
}

#[async_trait]
impl Tool for AnalyzeIntentTool {
    fn name(&self) -> &str {
        "analyze_message_intent"
    }

    fn description(&self) -> &str {
        "Classify a chat message into a command with a confidence score, without acting on it"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "message": { "type": "string", "description": "The chat message to analyze" }
            },
            "required": ["message"]
        })
    }

    async fn invoke(&self, input: Value) -> Result<Value, LarkError> {
        let args: Args = parse_args(self.name(), input)?;
        let intent = self.ctx.classifier.classify(&args.message);
        Ok(json!({
            "command_type": intent.command_type(),
            "confidence": intent.confidence(),
            "band": self.ctx.policy.band(&intent).to_string(),
            "parameters": intent.parameters(),
            "original_message": intent.raw_message(),
        }))
    }
}
