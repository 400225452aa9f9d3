//! App state, input handling, panel event handling.

use std::sync::Arc;

use tracing::debug;

use matchchat_core::events::{InputState, Notification, PanelEvent};
use matchchat_core::types::RenderedMessage;
use matchchat_core::ChatPanel;

/// The main application state: a mirror of one chat panel.
pub struct App {
    pub panel: Arc<ChatPanel>,
    pub messages: Vec<RenderedMessage>,
    pub input: InputState,
    pub notice: Option<Notification>,
    pub scroll_offset: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(panel: Arc<ChatPanel>) -> Self {
        let input = panel.input();
        let messages = panel.messages();
        App {
            panel,
            messages,
            input,
            notice: None,
            scroll_offset: 0,
            should_quit: false,
        }
    }

    /// Apply a panel event to the view.
    pub fn handle_event(&mut self, event: PanelEvent) {
        debug!("Panel event {}", event.to_json());
        match event {
            PanelEvent::Rendered(message) => {
                self.messages.push(message);
            }
            PanelEvent::ScrollToBottom => {
                self.scroll_offset = 0;
            }
            PanelEvent::Input(state) => {
                self.input = state;
            }
            PanelEvent::Focus => {
                debug!("Input focused");
            }
            PanelEvent::Notice(notice) => {
                self.notice = Some(notice);
            }
        }
    }

    pub fn type_char(&mut self, c: char) {
        let mut text = self.input.text.clone();
        text.push(c);
        self.replace_input(text);
    }

    pub fn backspace(&mut self) {
        let mut text = self.input.text.clone();
        text.pop();
        self.replace_input(text);
    }

    fn replace_input(&mut self, text: String) {
        if self.panel.set_input(text.clone()) {
            self.input.text = text;
            // typing again dismisses the last notice
            self.notice = None;
        }
    }

    /// Submit the current input without blocking the draw loop.
    pub fn send_message(&mut self) {
        if !self.input.enabled || self.input.text.trim().is_empty() {
            return;
        }
        let panel = Arc::clone(&self.panel);
        tokio::spawn(async move {
            panel.submit_input().await;
        });
    }

    /// Scroll back by three messages, keeping at least the oldest one on screen.
    pub fn scroll_up(&mut self) {
        let max = self.messages.len().saturating_sub(1);
        self.scroll_offset = self.scroll_offset.saturating_add(3).min(max);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }
}
