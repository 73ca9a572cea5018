// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat-facing side of Larkmaster.
//!
//! [`MessageHandler`] turns one chat message into one platform action and a
//! reply. [`BotEventHandler`] sits in front of it for bot webhook deliveries.

pub mod events;
pub mod handler;
mod replies;

pub use events::{
    message_text, BotEventHandler, WebhookPayload, BOT_ADDED, DEDUPE_WINDOW, MESSAGE_RECEIVED,
};
pub use handler::{CommandResult, MessageHandler};
