//! Chat endpoint client.
//!
//! DESIGN
//! ======
//! `ChatTransport` is the seam the widget sends prompts through. The real
//! implementation, `HttpTransport`, posts `{ "prompt": ... }` to
//! `{base_url}/chat` and decodes `{ "reply": ... }` or `{ "error": ... }`.
//! The body is decoded whatever the HTTP status, since the server reports
//! its failures as JSON with a 500.
//!
//! ERROR HANDLING
//! ==============
//! A response is a success only when it decodes to a JSON object with a
//! non-empty string `reply` and no `error` key. Everything else maps to a
//! `ChatError` variant; the widget decides what the user sees.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::ChatError;

/// Header carrying the storefront token, when one is configured.
pub const TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Wire body for `POST /chat`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatRequest<'a> {
    pub prompt: &'a str,
}

/// Sends one prompt and returns the bot's reply text.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_prompt(&self, prompt: &str) -> Result<String, ChatError>;
}

/// Interpret a `/chat` response body.
///
/// # Errors
///
/// `Decode` if the body is not JSON, `Application` if it carries `error`,
/// `MissingReply` if `reply` is absent, empty, or not a string.
pub fn parse_reply(body: &str) -> Result<String, ChatError> {
    let json: Value = serde_json::from_str(body).map_err(|e| ChatError::Decode(e.to_string()))?;

    if let Some(error) = json.get("error") {
        let message = error.as_str().map_or_else(|| error.to_string(), str::to_owned);
        return Err(ChatError::Application(message));
    }

    match json.get("reply").and_then(Value::as_str) {
        Some(reply) if !reply.is_empty() => Ok(reply.to_owned()),
        _ => Err(ChatError::MissingReply),
    }
}

// =============================================================================
// HTTP
// =============================================================================

pub struct HttpTransport {
    http: reqwest::Client,
    chat_url: String,
    health_url: String,
    token: Option<String>,
}

impl HttpTransport {
    /// Build a transport for the server at `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ChatError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, chat_url: config.chat_url(), health_url: config.health_url(), token: None })
    }

    /// Forward `token` with every chat request. Empty tokens are ignored.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    #[must_use]
    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    /// Probe `GET /health`.
    ///
    /// # Errors
    ///
    /// `Network` if the server is unreachable or answers with a non-2xx status.
    pub async fn ping(&self) -> Result<(), ChatError> {
        let response = self.http.get(&self.health_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Network(format!("health check returned HTTP {}", status.as_u16())));
        }
        debug!(url = %self.health_url, "chat: health ok");
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send_prompt(&self, prompt: &str) -> Result<String, ChatError> {
        let mut request = self.http.post(&self.chat_url).json(&ChatRequest { prompt });
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        info!(status, prompt_len = prompt.len(), body_len = body.len(), "chat: response received");

        parse_reply(&body)
    }
}
