//! PanelEvent enum — broadcast from a ChatPanel to its frontends via tokio::broadcast.

use serde::{Deserialize, Serialize};

use crate::types::RenderedMessage;

/// Events broadcast from a panel to all subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum PanelEvent {
    /// A message was appended to the list
    #[serde(rename = "rendered")]
    Rendered(RenderedMessage),

    /// The list should show its newest entry
    #[serde(rename = "scroll_to_bottom")]
    ScrollToBottom,

    /// Input control changed (text cleared, enabled/disabled)
    #[serde(rename = "input")]
    Input(InputState),

    /// Input control should take focus
    #[serde(rename = "focus")]
    Focus,

    /// Non-blocking user-facing notification
    #[serde(rename = "notice")]
    Notice(Notification),
}

impl PanelEvent {
    /// Serialize to `{"event": "...", "data": {...}}`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputState {
    pub text: String,
    pub enabled: bool,
    /// Times focus has been requested since the panel was mounted
    pub focus_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notification {
    pub fn error(text: impl Into<String>) -> Self {
        Notification {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}
