//! HttpChatApi against a mockito server: request shape and response handling.

use std::sync::Arc;

use matchchat_core::panel::{SubmitOutcome, SEND_FAILED};
use matchchat_core::{ChatApi, ChatError, ChatPanel, Config, HttpChatApi, PanelEvent};
use mockito::Matcher;
use serde_json::json;

fn config_for(server: &mockito::ServerGuard) -> Config {
    Config {
        base_url: server.url(),
        match_id: Some(7),
        csrf_token: Some("csrf-abc".into()),
        session_id: Some("alice-session".into()),
        ..Config::default()
    }
}

#[tokio::test]
async fn send_message_posts_json_with_csrf_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/send-message/")
        .match_header("x-csrftoken", "csrf-abc")
        .match_header("cookie", "csrftoken=csrf-abc; sessionid=alice-session")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"match_id": 7, "content": "hello"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "status": "success",
                "message": {
                    "id": 12,
                    "content": "hello",
                    "sender": "alice",
                    "timestamp": "2025-03-01T14:07:33.120000+00:00",
                    "is_mine": true
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let api = HttpChatApi::new(&config_for(&server)).unwrap();
    let message = api.send_message(7, "hello").await.unwrap();

    assert_eq!(message.id, 12);
    assert!(message.is_mine);
    mock.assert_async().await;
}

#[tokio::test]
async fn send_message_error_status_is_rejection() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/send-message/")
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "error", "message": "Access denied"}"#)
        .create_async()
        .await;

    let api = HttpChatApi::new(&config_for(&server)).unwrap();
    match api.send_message(7, "hello").await {
        Err(ChatError::Rejected(text)) => assert_eq!(text, "Access denied"),
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn send_message_non_json_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/send-message/")
        .with_status(500)
        .with_body("<html>Server Error</html>")
        .create_async()
        .await;

    let api = HttpChatApi::new(&config_for(&server)).unwrap();
    let err = api.send_message(7, "hello").await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn fetch_messages_sends_cursor_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/get-messages/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("match_id".into(), "7".into()),
            Matcher::UrlEncoded("last_message_id".into(), "4".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "status": "success",
                "messages": [
                    {"id": 5, "content": "a", "sender": "bob", "timestamp": "2025-03-01T10:00:00+00:00", "is_mine": false},
                    {"id": 6, "content": "b", "sender": "alice", "timestamp": "2025-03-01T10:01:00+00:00", "is_mine": true}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let api = HttpChatApi::new(&config_for(&server)).unwrap();
    let messages = api.fetch_messages(7, 4).await.unwrap();

    let ids: Vec<u64> = messages.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![5, 6]);
    mock.assert_async().await;
}

#[tokio::test]
async fn panel_submit_against_unreachable_server_notifies_once() {
    // grab a free port, then release it so connections are refused
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = Config {
        base_url: format!("http://127.0.0.1:{}", port),
        match_id: Some(7),
        ..Config::default()
    };
    let api = Arc::new(HttpChatApi::new(&config).unwrap());
    let panel = ChatPanel::from_config(&config, api);
    let mut rx = panel.subscribe();

    assert_eq!(panel.submit("hello").await, SubmitOutcome::Failed);

    let mut notices = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let PanelEvent::Notice(n) = event {
            notices.push(n.text);
        }
    }
    assert_eq!(notices, vec![SEND_FAILED.to_string()]);
    assert!(panel.input().enabled);
}

#[tokio::test]
async fn panel_poll_renders_fetched_messages() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/get-messages/")
        .match_query(Matcher::UrlEncoded("last_message_id".into(), "4".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "status": "success",
                "messages": [
                    {"id": 5, "content": "a", "timestamp": "2025-03-01T10:00:00+00:00", "is_mine": false},
                    {"id": 6, "content": "b", "timestamp": "2025-03-01T10:01:00+00:00", "is_mine": false}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut config = config_for(&server);
    config.last_message_id = Some("4".into());
    let api = Arc::new(HttpChatApi::new(&config).unwrap());
    let panel = ChatPanel::from_config(&config, api);

    assert_eq!(panel.poll().await, 2);
    assert_eq!(panel.cursor(), 6);
}
