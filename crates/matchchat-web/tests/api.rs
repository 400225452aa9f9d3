//! Router-level tests for the dev server, driven with tower's oneshot.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use matchchat_web::seed::Seed;
use matchchat_web::server::{router, AppState};

const ALICE: &str = "csrftoken=tok; sessionid=alice-session";
const BOB: &str = "csrftoken=tok; sessionid=bob-session";

fn app() -> Router {
    router(AppState::new(Seed::demo()))
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn send(cookie: &str, csrf: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/send-message/")
        .header("content-type", "application/json")
        .header("cookie", cookie)
        .header("X-CSRFToken", csrf)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn fetch(cookie: &str, query: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/api/get-messages/?{}", query))
        .header("cookie", cookie)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn send_returns_message_marked_mine() {
    let app = app();
    let (status, body) = call(&app, send(ALICE, "tok", json!({"match_id": 1, "content": " woof "}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"]["id"], 1);
    assert_eq!(body["message"]["content"], "woof");
    assert_eq!(body["message"]["sender"], "alice");
    assert_eq!(body["message"]["is_mine"], true);
}

#[tokio::test]
async fn send_accepts_string_match_id() {
    let app = app();
    let (status, _) = call(&app, send(ALICE, "tok", json!({"match_id": "1", "content": "hi"}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn send_requires_matching_csrf_token() {
    let app = app();
    let (status, body) = call(&app, send(ALICE, "wrong", json!({"match_id": 1, "content": "hi"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "CSRF verification failed");
}

#[tokio::test]
async fn send_requires_session() {
    let app = app();
    let (status, body) = call(&app, send("csrftoken=tok", "tok", json!({"match_id": 1, "content": "hi"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn send_validation_errors() {
    let app = app();

    let (status, body) = call(&app, send(ALICE, "tok", json!({"match_id": 1, "content": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Empty message");

    let (status, body) = call(&app, send(ALICE, "tok", json!({"match_id": 99, "content": "hi"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Match not found");

    let mallory = "csrftoken=tok; sessionid=nobody";
    let (status, _) = call(&app, send(mallory, "tok", json!({"match_id": 1, "content": "hi"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn send_malformed_json_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/send-message/")
        .header("cookie", ALICE)
        .header("X-CSRFToken", "tok")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = call(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn fetch_returns_only_newer_messages_per_viewer() {
    let app = app();
    for (cookie, text) in [(ALICE, "one"), (BOB, "two"), (BOB, "three")] {
        let (status, _) = call(&app, send(cookie, "tok", json!({"match_id": 1, "content": text}))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = call(&app, fetch(ALICE, "match_id=1&last_message_id=1")).await;
    assert_eq!(status, StatusCode::OK);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["id"], 2);
    assert_eq!(messages[1]["id"], 3);
    assert_eq!(messages[0]["is_mine"], false);

    let (_, body) = call(&app, fetch(BOB, "match_id=1")).await;
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["is_mine"], false);
    assert_eq!(messages[1]["is_mine"], true);
}

#[tokio::test]
async fn fetch_empty_and_invalid_cursor() {
    let app = app();

    let (status, body) = call(&app, fetch(ALICE, "match_id=1&last_message_id=0")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"], json!([]));

    let (status, body) = call(&app, fetch(ALICE, "match_id=1&last_message_id=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid last_message_id");

    let (status, _) = call(&app, fetch(ALICE, "match_id=42")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
