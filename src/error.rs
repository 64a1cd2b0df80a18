//! Error types for the chat pipeline and session storage.
//!
//! ERROR HANDLING
//! ==============
//! Every `ChatError` variant collapses to the same fallback bot message at
//! the widget boundary. The variants exist for logging and for callers that
//! use `HttpTransport` directly (the CLI `ping` command, tests).

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

// =============================================================================
// CHAT
// =============================================================================

/// Errors produced while exchanging a prompt with the `/chat` endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The request never completed: connect failure, timeout, aborted body.
    #[error("chat request failed: {0}")]
    Network(String),

    /// The response body was not valid JSON.
    #[error("chat response decode failed: {0}")]
    Decode(String),

    /// The server answered with an `error` field.
    #[error("chat server error: {0}")]
    Application(String),

    /// The response decoded but carried no usable `reply`.
    #[error("chat response missing reply")]
    MissingReply,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ChatError {
    /// Stable code used in log fields.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "E_NETWORK",
            Self::Decode(_) => "E_DECODE",
            Self::Application(_) => "E_APPLICATION",
            Self::MissingReply => "E_MISSING_REPLY",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    /// Whether a later attempt could plausibly succeed. Nothing retries
    /// automatically; this only feeds logs and CLI exit messages.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() { Self::Decode(e.to_string()) } else { Self::Network(e.to_string()) }
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// Errors produced by file-backed session storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is not a JSON string map: {0}")]
    Json(#[from] serde_json::Error),
}
