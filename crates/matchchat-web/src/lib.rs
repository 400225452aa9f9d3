//! matchchat-web — in-memory development server for the chat endpoints.
//!
//! Serves `/api/send-message/` and `/api/get-messages/` with the same
//! validation and payload shapes a production backend uses, so the panel can
//! be driven end to end without one.

pub mod seed;
pub mod server;
pub mod store;
