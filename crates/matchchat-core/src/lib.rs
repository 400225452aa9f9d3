//! matchchat-core — Chat panel logic, no UI.
//!
//! This crate holds the message types, the HTTP client for the send/fetch
//! endpoints, the panel controller that owns the cursor, and the poller that
//! drives it. It is UI-agnostic: frontends subscribe to panel events via
//! tokio::broadcast.

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod panel;
pub mod poller;
pub mod types;

pub use api::{ChatApi, HttpChatApi};
pub use config::Config;
pub use error::{ChatError, Result};
pub use events::PanelEvent;
pub use panel::ChatPanel;
pub use poller::Poller;
pub use types::{Message, MessageId};
