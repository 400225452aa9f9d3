//! Chat API — the send/fetch endpoints behind a trait, with a reqwest client.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};
use tracing::debug;

use crate::config::Config;
use crate::error::{ChatError, Result};
use crate::types::{
    FetchMessagesResponse, MatchId, Message, MessageId, SendMessageRequest, SendMessageResponse,
};

pub const SEND_MESSAGE_PATH: &str = "/api/send-message/";
pub const GET_MESSAGES_PATH: &str = "/api/get-messages/";
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// The two endpoints a chat panel talks to.
///
/// Both methods return `ChatError::Rejected` when the server answers with a
/// non-success status, and a transport/decode error otherwise.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn send_message(&self, match_id: MatchId, content: &str) -> Result<Message>;

    async fn fetch_messages(
        &self,
        match_id: MatchId,
        last_message_id: MessageId,
    ) -> Result<Vec<Message>>;
}

/// reqwest-backed client for a matchchat server.
pub struct HttpChatApi {
    client: reqwest::Client,
    base_url: String,
    csrf_token: Option<String>,
}

impl HttpChatApi {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = cookie_header(config) {
            let value = HeaderValue::from_str(&cookie)
                .map_err(|e| ChatError::Decode(format!("invalid cookie value: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let mut builder = reqwest::Client::builder()
            .user_agent("matchchat/0.1")
            .default_headers(headers);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            csrf_token: config.csrf_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Cookies the browser would have attached on its own.
fn cookie_header(config: &Config) -> Option<String> {
    let mut cookies = Vec::new();
    if let Some(ref token) = config.csrf_token {
        cookies.push(format!("csrftoken={}", token));
    }
    if let Some(ref session) = config.session_id {
        cookies.push(format!("sessionid={}", session));
    }
    if cookies.is_empty() {
        None
    } else {
        Some(cookies.join("; "))
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn send_message(&self, match_id: MatchId, content: &str) -> Result<Message> {
        let body = SendMessageRequest {
            match_id,
            content: content.to_string(),
        };

        let mut request = self
            .client
            .post(self.url(SEND_MESSAGE_PATH))
            .header(CONTENT_TYPE, "application/json")
            .json(&body);
        if let Some(ref token) = self.csrf_token {
            request = request.header(CSRF_HEADER, token);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        debug!("send-message -> {} ({} bytes)", status, text.len());

        let parsed: SendMessageResponse = serde_json::from_str(&text)?;
        parsed.into_result()
    }

    async fn fetch_messages(
        &self,
        match_id: MatchId,
        last_message_id: MessageId,
    ) -> Result<Vec<Message>> {
        let resp = self
            .client
            .get(self.url(GET_MESSAGES_PATH))
            .query(&[
                ("match_id", match_id.to_string()),
                ("last_message_id", last_message_id.to_string()),
            ])
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        debug!("get-messages -> {} ({} bytes)", status, text.len());

        let parsed: FetchMessagesResponse = serde_json::from_str(&text)?;
        parsed.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header_both() {
        let config = Config {
            csrf_token: Some("tok".into()),
            session_id: Some("sess".into()),
            ..Config::default()
        };
        assert_eq!(
            cookie_header(&config).as_deref(),
            Some("csrftoken=tok; sessionid=sess")
        );
    }

    #[test]
    fn test_cookie_header_none() {
        assert!(cookie_header(&Config::default()).is_none());
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        let config = Config {
            base_url: "http://localhost:8000/".into(),
            ..Config::default()
        };
        let api = HttpChatApi::new(&config).unwrap();
        assert_eq!(
            api.url(SEND_MESSAGE_PATH),
            "http://localhost:8000/api/send-message/"
        );
    }
}
