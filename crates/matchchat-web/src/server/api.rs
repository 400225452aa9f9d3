//! REST API endpoints — send a message, fetch newer messages.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header::COOKIE, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use matchchat_core::api::{CSRF_HEADER, GET_MESSAGES_PATH, SEND_MESSAGE_PATH};
use matchchat_core::types::{MatchId, MessageId, STATUS_SUCCESS};

use crate::store::StoreError;

use super::AppState;

type ApiResponse = (StatusCode, Json<Value>);

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(SEND_MESSAGE_PATH, post(send_message))
        .route(GET_MESSAGES_PATH, get(get_messages))
}

fn error(status: StatusCode, message: impl Into<String>) -> ApiResponse {
    (
        status,
        Json(json!({"status": "error", "message": message.into()})),
    )
}

fn store_error(e: StoreError) -> ApiResponse {
    let status = match e {
        StoreError::EmptyMessage => StatusCode::BAD_REQUEST,
        StoreError::MatchNotFound => StatusCode::NOT_FOUND,
        StoreError::AccessDenied => StatusCode::FORBIDDEN,
    };
    error(status, e.to_string())
}

/// Value of cookie `name` from the Cookie header(s).
fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
}

/// Match ids arrive as JSON numbers or as strings read off a form field.
fn parse_match_id(value: &Value) -> Option<MatchId> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Resolve the requesting user from the session cookie.
async fn current_user(state: &AppState, headers: &HeaderMap) -> Result<String, ApiResponse> {
    let session = cookie(headers, "sessionid")
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Authentication required"))?;
    let store = state.store.read().await;
    store
        .user_for_session(&session)
        .map(String::from)
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Authentication required"))
}

// --- Send ---

#[derive(Deserialize)]
struct SendBody {
    match_id: Option<Value>,
    #[serde(default)]
    content: String,
}

async fn send_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResponse {
    // CSRF: header must echo the csrftoken cookie
    let header_token = headers.get(CSRF_HEADER).and_then(|v| v.to_str().ok());
    let cookie_token = cookie(&headers, "csrftoken");
    match (header_token, cookie_token.as_deref()) {
        (Some(h), Some(c)) if !h.is_empty() && h == c => {}
        _ => return error(StatusCode::FORBIDDEN, "CSRF verification failed"),
    }

    let user = match current_user(&state, &headers).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let body: SendBody = match serde_json::from_slice(&body) {
        Ok(b) => b,
        Err(e) => return error(StatusCode::BAD_REQUEST, e.to_string()),
    };
    if body.content.trim().is_empty() {
        return store_error(StoreError::EmptyMessage);
    }
    let Some(match_id) = body.match_id.as_ref().and_then(parse_match_id) else {
        return store_error(StoreError::MatchNotFound);
    };

    let mut store = state.store.write().await;
    match store.post(match_id, &user, &body.content) {
        Ok(stored) => {
            info!("{} -> match {}: message {}", user, match_id, stored.id);
            (
                StatusCode::OK,
                Json(json!({
                    "status": STATUS_SUCCESS,
                    "message": stored.to_message(&user),
                })),
            )
        }
        Err(e) => store_error(e),
    }
}

// --- Fetch ---

async fn get_messages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> ApiResponse {
    let user = match current_user(&state, &headers).await {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let Some(match_id) = q.get("match_id").and_then(|s| s.trim().parse::<MatchId>().ok())
    else {
        return store_error(StoreError::MatchNotFound);
    };
    let last_message_id: MessageId = match q.get("last_message_id") {
        None => 0,
        Some(s) => match s.trim().parse() {
            Ok(id) => id,
            Err(_) => return error(StatusCode::BAD_REQUEST, "Invalid last_message_id"),
        },
    };

    let mut store = state.store.write().await;
    let unread = store.unread_count(match_id, &user);
    match store.since(match_id, &user, last_message_id) {
        Ok(messages) => {
            debug!(
                "{} polled match {} after {}: {} message(s), {} were unread",
                user,
                match_id,
                last_message_id,
                messages.len(),
                unread
            );
            let messages: Vec<_> = messages.iter().map(|m| m.to_message(&user)).collect();
            (
                StatusCode::OK,
                Json(json!({"status": STATUS_SUCCESS, "messages": messages})),
            )
        }
        Err(e) => store_error(e),
    }
}
