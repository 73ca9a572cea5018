// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool trait, registry, and the Lark tools exposed by Larkmaster.
//!
//! Built-in tools:
//! - [`builtin::AnalyzeIntentTool`] -- classify a message without acting on it
//! - [`builtin::ListTemplatesTool`] -- the template catalog
//! - [`builtin::DesignBitableTool`] -- a table design for a message
//! - [`builtin::GenerateDocumentationTool`] -- markdown for that design
//! - [`builtin::SmartBuildTool`] -- design and provision a base
//! - [`builtin::BuildWithWikiTool`] -- provision plus a wiki manual
//! - [`builtin::ProcessMessageTool`] -- full chat message handling
//! - [`builtin::BotHelpTool`] -- the bot's help text

pub mod builtin;
pub mod tool;

pub use builtin::{register_builtins, ToolContext};
pub use tool::{parse_args, Tool, ToolRegistry};
