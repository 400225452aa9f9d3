//! In-memory message store with per-match access checks.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use matchchat_core::types::{MatchId, Message, MessageId};

use crate::seed::Seed;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Empty message")]
    EmptyMessage,

    #[error("Match not found")]
    MatchNotFound,

    #[error("Access denied")]
    AccessDenied,
}

#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub id: MessageId,
    pub match_id: MatchId,
    pub sender: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

impl StoredMessage {
    /// Wire form, from the point of view of `viewer`.
    pub fn to_message(&self, viewer: &str) -> Message {
        Message {
            id: self.id,
            content: self.content.clone(),
            sender: Some(self.sender.clone()),
            timestamp: self.timestamp.to_rfc3339(),
            is_mine: self.sender == viewer,
        }
    }
}

pub struct ChatStore {
    matches: HashMap<MatchId, [String; 2]>,
    sessions: HashMap<String, String>,
    messages: Vec<StoredMessage>,
    next_id: MessageId,
}

impl ChatStore {
    pub fn new(seed: Seed) -> Self {
        Self {
            matches: seed
                .matches
                .into_iter()
                .map(|m| (m.id, m.participants))
                .collect(),
            sessions: seed.sessions,
            messages: Vec::new(),
            next_id: 1,
        }
    }

    pub fn user_for_session(&self, session_id: &str) -> Option<&str> {
        self.sessions.get(session_id).map(String::as_str)
    }

    fn check_access(&self, match_id: MatchId, user: &str) -> Result<(), StoreError> {
        let participants = self.matches.get(&match_id).ok_or(StoreError::MatchNotFound)?;
        if participants.iter().any(|p| p == user) {
            Ok(())
        } else {
            Err(StoreError::AccessDenied)
        }
    }

    /// Store a new message from `sender`. Content is trimmed first.
    pub fn post(
        &mut self,
        match_id: MatchId,
        sender: &str,
        content: &str,
    ) -> Result<StoredMessage, StoreError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(StoreError::EmptyMessage);
        }
        self.check_access(match_id, sender)?;

        let message = StoredMessage {
            id: self.next_id,
            match_id,
            sender: sender.to_string(),
            content: content.to_string(),
            timestamp: Utc::now(),
            is_read: false,
        };
        self.next_id += 1;
        self.messages.push(message.clone());
        Ok(message)
    }

    /// Messages in the match with id above `last_message_id`, oldest first.
    /// The other party's messages are marked read on the way out.
    pub fn since(
        &mut self,
        match_id: MatchId,
        viewer: &str,
        last_message_id: MessageId,
    ) -> Result<Vec<StoredMessage>, StoreError> {
        self.check_access(match_id, viewer)?;

        let mut out = Vec::new();
        for message in self
            .messages
            .iter_mut()
            .filter(|m| m.match_id == match_id && m.id > last_message_id)
        {
            if message.sender != viewer {
                message.is_read = true;
            }
            out.push(message.clone());
        }
        Ok(out)
    }

    pub fn unread_count(&self, match_id: MatchId, viewer: &str) -> usize {
        self.messages
            .iter()
            .filter(|m| m.match_id == match_id && m.sender != viewer && !m.is_read)
            .count()
    }
}
