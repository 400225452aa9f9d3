//! The chat panel controller — owns the cursor, the rendered list and the input.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::api::ChatApi;
use crate::config::Config;
use crate::error::ChatError;
use crate::events::{InputState, Notification, PanelEvent};
use crate::poller::Poller;
use crate::types::{MatchId, Message, MessageId, RenderedMessage};

/// Generic text shown when a submit fails below the application layer.
pub const SEND_FAILED: &str = "Failed to send message";

/// What a call to `submit` ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty content, or another submit still in flight; nothing was sent
    Ignored,
    Sent(MessageId),
    Rejected(String),
    Failed,
}

struct PanelState {
    cursor: MessageId,
    /// Everything up to here was already on screen when the panel mounted
    seed: MessageId,
    messages: Vec<RenderedMessage>,
    seen: HashSet<MessageId>,
    input: InputState,
}

impl PanelState {
    fn has_rendered(&self, id: MessageId) -> bool {
        id <= self.seed || self.seen.contains(&id)
    }

    fn append(&mut self, message: &Message) -> RenderedMessage {
        let rendered = RenderedMessage::from(message);
        self.messages.push(rendered.clone());
        self.seen.insert(message.id);
        self.cursor = self.cursor.max(message.id);
        rendered
    }
}

/// A chat panel bound to one match.
///
/// Shared as `Arc<ChatPanel>` between the poller and whoever drives submits.
/// The state lock is never held across an await.
pub struct ChatPanel {
    match_id: MatchId,
    api: Arc<dyn ChatApi>,
    state: Mutex<PanelState>,
    event_tx: broadcast::Sender<PanelEvent>,
}

impl ChatPanel {
    pub fn new(match_id: MatchId, initial_cursor: MessageId, api: Arc<dyn ChatApi>) -> Self {
        let (event_tx, _) = broadcast::channel(256);

        Self {
            match_id,
            api,
            state: Mutex::new(PanelState {
                cursor: initial_cursor,
                seed: initial_cursor,
                messages: Vec::new(),
                seen: HashSet::new(),
                input: InputState {
                    enabled: true,
                    ..InputState::default()
                },
            }),
            event_tx,
        }
    }

    pub fn from_config(config: &Config, api: Arc<dyn ChatApi>) -> Self {
        Self::new(config.match_id(), config.initial_cursor(), api)
    }

    /// Scroll to the bottom and start polling every `period`.
    /// Polling stops when the returned Poller is stopped or dropped.
    pub fn mount(self: &Arc<Self>, period: Duration) -> Poller {
        info!(
            "Mounting chat panel for match {} at cursor {}",
            self.match_id,
            self.cursor()
        );
        self.broadcast(PanelEvent::ScrollToBottom);
        Poller::start(Arc::clone(self), period)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.event_tx.subscribe()
    }

    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    pub fn cursor(&self) -> MessageId {
        self.state().cursor
    }

    pub fn messages(&self) -> Vec<RenderedMessage> {
        self.state().messages.clone()
    }

    pub fn input(&self) -> InputState {
        self.state().input.clone()
    }

    /// Replace the input text. Ignored while a submit is in flight.
    pub fn set_input(&self, text: impl Into<String>) -> bool {
        let mut state = self.state();
        if !state.input.enabled {
            return false;
        }
        state.input.text = text.into();
        true
    }

    fn state(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn broadcast(&self, event: PanelEvent) {
        let _ = self.event_tx.send(event);
    }

    // ── Rendering ──

    /// Append a message, scroll to it and advance the cursor.
    /// No deduplication: callers must not pass an id that is already on screen.
    pub fn render(&self, message: &Message) {
        let mut state = self.state();
        let rendered = state.append(message);
        self.broadcast(PanelEvent::Rendered(rendered));
        self.broadcast(PanelEvent::ScrollToBottom);
    }

    /// Render unless the id is already on screen. A poll and a submit racing
    /// each other can both deliver the same message.
    fn accept(&self, message: &Message) -> bool {
        let mut state = self.state();
        if state.has_rendered(message.id) {
            debug!("Skipping message {} (already rendered)", message.id);
            return false;
        }
        let rendered = state.append(message);
        self.broadcast(PanelEvent::Rendered(rendered));
        self.broadcast(PanelEvent::ScrollToBottom);
        true
    }

    // ── Submit ──

    /// Submit whatever is in the input control.
    pub async fn submit_input(&self) -> SubmitOutcome {
        let text = self.state().input.text.clone();
        self.submit(&text).await
    }

    /// Send `content` to the match. The input is disabled while the request is
    /// in flight and re-enabled and focused once it settles, whatever the result.
    /// A second submit while one is in flight is ignored.
    pub async fn submit(&self, content: &str) -> SubmitOutcome {
        let content = content.trim();
        if content.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let Some(snapshot) = self.begin_submit() else {
            debug!("Submit ignored, another send is in flight");
            return SubmitOutcome::Ignored;
        };
        self.broadcast(PanelEvent::Input(snapshot));

        let outcome = match self.api.send_message(self.match_id, content).await {
            Ok(message) => {
                self.accept(&message);
                self.state().input.text.clear();
                SubmitOutcome::Sent(message.id)
            }
            Err(ChatError::Rejected(text)) => {
                warn!("Message rejected by server: {}", text);
                self.broadcast(PanelEvent::Notice(Notification::error(format!(
                    "{}: {}",
                    SEND_FAILED, text
                ))));
                SubmitOutcome::Rejected(text)
            }
            Err(e) => {
                warn!("Sending message failed: {}", e);
                self.broadcast(PanelEvent::Notice(Notification::error(SEND_FAILED)));
                SubmitOutcome::Failed
            }
        };

        self.settle_input();
        outcome
    }

    /// Disable the input if it is enabled. None when a submit already holds it.
    fn begin_submit(&self) -> Option<InputState> {
        let mut state = self.state();
        if !state.input.enabled {
            return None;
        }
        state.input.enabled = false;
        Some(state.input.clone())
    }

    #[cfg(test)]
    fn set_enabled(&self, enabled: bool) {
        let snapshot = {
            let mut state = self.state();
            state.input.enabled = enabled;
            state.input.clone()
        };
        self.broadcast(PanelEvent::Input(snapshot));
    }

    fn settle_input(&self) {
        let snapshot = {
            let mut state = self.state();
            state.input.enabled = true;
            state.input.focus_count += 1;
            state.input.clone()
        };
        self.broadcast(PanelEvent::Input(snapshot));
        self.broadcast(PanelEvent::Focus);
    }

    // ── Poll ──

    /// Fetch messages newer than the cursor and render them in order.
    /// Failures are logged only. Returns how many messages were rendered.
    pub async fn poll(&self) -> usize {
        let cursor = self.cursor();
        match self.api.fetch_messages(self.match_id, cursor).await {
            Ok(messages) => {
                let mut rendered = 0;
                for message in &messages {
                    if self.accept(message) {
                        rendered += 1;
                    }
                }
                if rendered > 0 {
                    debug!("Rendered {} new message(s), cursor now {}", rendered, self.cursor());
                }
                rendered
            }
            Err(ChatError::Rejected(text)) => {
                debug!("Fetch rejected by server: {}", text);
                0
            }
            Err(e) => {
                warn!("Error fetching messages: {}", e);
                0
            }
        }
    }
}
