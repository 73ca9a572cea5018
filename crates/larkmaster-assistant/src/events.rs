// SPDX-FileCopyrightText: 2026 Larkmaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot webhook events.
//!
//! Handles URL-verification challenges, `im.message.receive_v1` deliveries
//! and `im.chat.member.bot.added_v1` notices. A received text message has
//! its `@_user_N` mention placeholders stripped, goes through the
//! [`MessageHandler`], and the reply is posted back to the originating chat.
//!
//! The platform redelivers webhooks it considers unanswered, so message ids
//! seen within [`DEDUPE_WINDOW`] are acknowledged without running again.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use larkmaster_core::{Endpoint, PlatformApi};

use crate::handler::MessageHandler;
use crate::replies;

pub const MESSAGE_RECEIVED: &str = "im.message.receive_v1";
pub const BOT_ADDED: &str = "im.chat.member.bot.added_v1";

/// How long a delivered message id is remembered.
pub const DEDUPE_WINDOW: Duration = Duration::from_secs(300);

/// Upper bound on remembered message ids; the oldest is evicted first.
const MAX_TRACKED_MESSAGES: usize = 10_000;

static MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@_user_\d+").unwrap());

/// The parts of a webhook body this handler reads.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub challenge: Option<String>,
    #[serde(default)]
    pub header: Option<EventHeader>,
    #[serde(default)]
    pub event: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventHeader {
    #[serde(default)]
    pub event_type: String,
}

#[derive(Debug, Deserialize)]
struct MessageEvent {
    message: ReceivedMessage,
    #[serde(default)]
    sender: Option<Sender>,
}

#[derive(Debug, Deserialize)]
struct ReceivedMessage {
    #[serde(default)]
    message_id: String,
    #[serde(default)]
    chat_id: String,
    #[serde(default)]
    message_type: String,
    /// JSON-encoded, e.g. `{"text":"@_user_1 ヘルプ"}`.
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct Sender {
    #[serde(default)]
    sender_type: String,
}

#[derive(Debug, Deserialize)]
struct BotAddedEvent {
    #[serde(default)]
    chat_id: String,
}

/// Text of a message `content` field with mention placeholders removed.
pub fn message_text(content: &str) -> String {
    let text = match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => map
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => content.to_string(),
    };
    MENTION.replace_all(&text, "").trim().to_string()
}

/// Message ids delivered recently, pruned by age and bounded in size.
#[derive(Debug)]
struct RecentMessages {
    seen: HashMap<String, Instant>,
    window: Duration,
    capacity: usize,
}

impl RecentMessages {
    fn new(window: Duration, capacity: usize) -> Self {
        Self {
            seen: HashMap::new(),
            window,
            capacity,
        }
    }

    /// Records `id` and reports whether it was already seen within the window.
    fn check_and_record(&mut self, id: &str, now: Instant) -> bool {
        let window = self.window;
        self.seen.retain(|_, at| now.duration_since(*at) < window);
        if self.seen.contains_key(id) {
            return true;
        }
        if self.seen.len() >= self.capacity {
            let oldest = self
                .seen
                .iter()
                .min_by_key(|(_, at)| **at)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                self.seen.remove(&oldest);
            }
        }
        self.seen.insert(id.to_string(), now);
        false
    }
}

pub struct BotEventHandler {
    handler: Arc<MessageHandler>,
    platform: Arc<dyn PlatformApi>,
    processed: Mutex<RecentMessages>,
}

impl BotEventHandler {
    pub fn new(handler: Arc<MessageHandler>, platform: Arc<dyn PlatformApi>) -> Self {
        Self {
            handler,
            platform,
            processed: Mutex::new(RecentMessages::new(DEDUPE_WINDOW, MAX_TRACKED_MESSAGES)),
        }
    }

    /// Handles one webhook body and returns the JSON response for it.
    pub async fn handle_event(&self, payload: &Value) -> Value {
        let payload = match WebhookPayload::deserialize(payload) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "malformed webhook payload");
                return json!({ "status": "invalid_payload" });
            }
        };

        if payload.kind.as_deref() == Some("url_verification") {
            debug!("answering url verification challenge");
            return json!({ "challenge": payload.challenge.unwrap_or_default() });
        }

        let event_type = payload
            .header
            .as_ref()
            .map(|h| h.event_type.as_str())
            .unwrap_or_default();
        match event_type {
            MESSAGE_RECEIVED => self.handle_message_event(payload.event).await,
            BOT_ADDED => self.handle_bot_added(payload.event).await,
            _ => {
                info!(event_type, "ignoring unhandled event type");
                json!({ "status": "ignored", "event_type": event_type })
            }
        }
    }

    async fn handle_message_event(&self, event: Option<Value>) -> Value {
        let Some(event) = event.and_then(|e| MessageEvent::deserialize(e).ok()) else {
            warn!("message event without a message body");
            return json!({ "status": "invalid_payload" });
        };
        let message = &event.message;

        if !message.message_id.is_empty() {
            let duplicate = self
                .processed
                .lock()
                .await
                .check_and_record(&message.message_id, Instant::now());
            if duplicate {
                info!(message_id = %message.message_id, "duplicate delivery ignored");
                return json!({ "status": "duplicate" });
            }
        }

        if event.sender.as_ref().is_some_and(|s| s.sender_type == "app") {
            debug!(message_id = %message.message_id, "ignoring message sent by an app");
            return json!({ "status": "ignored_self" });
        }

        if message.message_type != "text" {
            info!(message_type = %message.message_type, "non-text message ignored");
            return json!({ "status": "ignored_non_text" });
        }

        let text = message_text(&message.content);
        if text.is_empty() {
            return json!({ "status": "empty_message" });
        }

        let result = self.handler.handle_message(&text).await;
        let replied = self.reply(&message.chat_id, &result.message).await;

        json!({
            "status": "processed",
            "command_type": result.command_type,
            "success": result.success,
            "replied": replied,
        })
    }

    async fn handle_bot_added(&self, event: Option<Value>) -> Value {
        let chat_id = event
            .and_then(|e| BotAddedEvent::deserialize(e).ok())
            .map(|e| e.chat_id)
            .unwrap_or_default();
        info!(chat_id = %chat_id, "bot added to chat");
        let replied = self.reply(&chat_id, &replies::welcome()).await;
        json!({ "status": "welcomed", "chat_id": chat_id, "replied": replied })
    }

    /// Posts `text` to `chat_id`; a failed send is logged, not raised.
    async fn reply(&self, chat_id: &str, text: &str) -> bool {
        if chat_id.is_empty() {
            return false;
        }
        let body = json!({
            "receive_id": chat_id,
            "msg_type": "text",
            "content": json!({ "text": text }).to_string(),
        });
        match self.platform.invoke(Endpoint::SendMessage, body).await {
            Ok(_) => true,
            Err(e) => {
                warn!(chat_id, error = %e, "failed to send reply");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_text_strips_mention_placeholders_only() {
        assert_eq!(message_text(r#"{"text":"@_user_1 ヘルプ"}"#), "ヘルプ");
        assert_eq!(message_text(r#"{"text":"@_user_1"}"#), "");
        assert_eq!(
            message_text(r#"{"text":"@_user_12 連絡先 sato@example.com を検索"}"#),
            "連絡先 sato@example.com を検索"
        );
        assert_eq!(message_text("plain @_user_3 text"), "plain  text");
        assert_eq!(message_text(r#"{"image_key":"img"}"#), "");
    }

    #[tokio::test(start_paused = true)]
    async fn recent_messages_expire_after_the_window() {
        let mut recent = RecentMessages::new(DEDUPE_WINDOW, 100);
        assert!(!recent.check_and_record("om_1", Instant::now()));
        assert!(recent.check_and_record("om_1", Instant::now()));

        tokio::time::advance(DEDUPE_WINDOW - Duration::from_secs(1)).await;
        assert!(recent.check_and_record("om_1", Instant::now()));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!recent.check_and_record("om_1", Instant::now()));
    }

    #[tokio::test(start_paused = true)]
    async fn recent_messages_evict_the_oldest_at_capacity() {
        let mut recent = RecentMessages::new(DEDUPE_WINDOW, 2);
        recent.check_and_record("om_1", Instant::now());
        tokio::time::advance(Duration::from_secs(1)).await;
        recent.check_and_record("om_2", Instant::now());
        tokio::time::advance(Duration::from_secs(1)).await;
        recent.check_and_record("om_3", Instant::now());

        assert_eq!(recent.seen.len(), 2);
        assert!(!recent.seen.contains_key("om_1"));
        assert!(recent.check_and_record("om_3", Instant::now()));
    }
}
