// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool trait and registry.
//!
//! The [`Tool`] trait is the uniform interface the gateway's `/call` route
//! and the CLI dispatch through. The [`ToolRegistry`] looks tools up by name
//! and renders their definitions for `/tools`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use larkmaster_core::LarkError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// A named operation invoked with JSON arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name used for lookup.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema of the accepted arguments.
    fn parameters_schema(&self) -> Value;

    async fn invoke(&self, input: Value) -> Result<Value, LarkError>;
}

/// Deserializes tool arguments, mapping schema mismatches to
/// [`LarkError::InvalidInput`].
pub fn parse_args<T: DeserializeOwned>(tool: &str, input: Value) -> Result<T, LarkError> {
    serde_json::from_value(input).map_err(|e| LarkError::InvalidInput(format!("{tool}: {e}")))
}

/// Serializes a tool result.
pub(crate) fn to_output<T: serde::Serialize>(value: &T) -> Result<Value, LarkError> {
    serde_json::to_value(value).map_err(|e| LarkError::Internal(format!("serialize result: {e}")))
}

/// Registry of available tools, indexed by name.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registers a tool under its `name()`, replacing any previous one.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Looks up `name` and invokes it.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<Value, LarkError> {
        let tool = self.get(name).ok_or_else(|| LarkError::ToolNotFound {
            name: name.to_string(),
        })?;
        debug!(tool = name, "invoking tool");
        tool.invoke(arguments).await
    }

    /// (name, description) pairs sorted by name.
    pub fn list(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .tools
            .values()
            .map(|t| (t.name(), t.description()))
            .collect();
        entries.sort_by_key(|(name, _)| *name);
        entries
    }

    /// Tool definitions sorted by name, each shaped as
    /// `{"name", "description", "input_schema"}`.
    pub fn tool_definitions(&self) -> Vec<Value> {
        let mut tools: Vec<&Arc<dyn Tool>> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name().cmp(b.name()));
        tools
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "input_schema": t.parameters_schema(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.list().into_iter().map(|(name, _)| name).collect();
        f.debug_struct("ToolRegistry").field("tools", &names).finish()
    }
}
