//! Core types — Message, wire request/response bodies, rendered view.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ChatError, Result};

/// Server-assigned message id. Monotonically increasing per server.
pub type MessageId = u64;

/// Conversation (match) identifier.
pub type MatchId = u64;

/// Payload status the server uses for a successful call.
pub const STATUS_SUCCESS: &str = "success";

// ── Message ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    /// Sender username, when the server includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    pub timestamp: String,
    pub is_mine: bool,
}

impl Message {
    pub fn side(&self) -> Side {
        if self.is_mine {
            Side::Mine
        } else {
            Side::Theirs
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Mine,
    Theirs,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Mine => write!(f, "mine"),
            Side::Theirs => write!(f, "theirs"),
        }
    }
}

// ── Rendered view ──

/// A message as it sits in the panel's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub id: MessageId,
    pub side: Side,
    pub content: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

impl From<&Message> for RenderedMessage {
    fn from(message: &Message) -> Self {
        RenderedMessage {
            id: message.id,
            side: message.side(),
            content: message.content.clone(),
            time: display_time(&message.timestamp),
            sender: message.sender.clone(),
        }
    }
}

/// Format a server timestamp for display as `HH:MM`.
/// Anything that isn't ISO-8601 is shown as-is.
pub fn display_time(timestamp: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.format("%H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%H:%M").to_string();
    }
    timestamp.to_string()
}

/// Parse the initial cursor seed. Absent or invalid values fall back to 0.
pub fn parse_cursor(seed: Option<&str>) -> MessageId {
    seed.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

// ── Wire bodies ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub match_id: MatchId,
    pub content: String,
}

/// `message` is a Message on success and the error text otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SendPayload {
    Message(Message),
    Error(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<SendPayload>,
}

impl SendMessageResponse {
    pub fn into_result(self) -> Result<Message> {
        let success = self.status == STATUS_SUCCESS;
        match (success, self.message) {
            (true, Some(SendPayload::Message(message))) => Ok(message),
            (true, _) => Err(ChatError::Decode(
                "success response without a message".into(),
            )),
            (false, Some(SendPayload::Error(text))) => Err(ChatError::Rejected(text)),
            (false, _) => Err(ChatError::Rejected(self.status)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchMessagesResponse {
    pub status: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FetchMessagesResponse {
    pub fn into_result(self) -> Result<Vec<Message>> {
        if self.status == STATUS_SUCCESS {
            Ok(self.messages)
        } else {
            Err(ChatError::Rejected(self.message.unwrap_or(self.status)))
        }
    }
}
