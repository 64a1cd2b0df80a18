//! Widget configuration.
//!
//! DESIGN
//! ======
//! Three layers, each explicit:
//! - `RuntimeConfig`: the configuration object injected by the host page
//!   (here: CLI flags, env vars, or a JSON file).
//! - `SessionConfig`: display name, shop and token resolved once at widget
//!   creation from session storage, then runtime config, then defaults, and
//!   written back so the next load in the same session reuses them.
//! - `ClientConfig`: endpoint and pacing knobs read from the environment.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::StorageError;
use crate::storage::{KEY_BOT_NAME, KEY_SHOPIFY_DOMAIN, KEY_SHOPIFY_TOKEN, SessionStorage};

pub const DEFAULT_BOT_NAME: &str = "SEEP";
pub const DEFAULT_SHOP_DOMAIN: &str = "example.myshopify.com";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:10000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REVEAL_INTERVAL_MS: u64 = 20;

// =============================================================================
// RUNTIME CONFIG
// =============================================================================

/// Configuration injected by the host. Unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub bot_name: Option<String>,
    #[serde(default)]
    pub shopify_domain: Option<String>,
}

impl RuntimeConfig {
    /// Parse the injected JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a JSON object with string fields.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Read and parse a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, StorageError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&raw)?)
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    #[must_use]
    pub fn merged_with(self, other: Self) -> Self {
        Self {
            bot_name: other.bot_name.or(self.bot_name),
            shopify_domain: other.shopify_domain.or(self.shopify_domain),
        }
    }
}

// =============================================================================
// SESSION CONFIG
// =============================================================================

/// Values the widget uses for its whole lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub bot_name: String,
    pub shop_domain: String,
    pub auth_token: Option<String>,
}

impl SessionConfig {
    /// Resolve each field (persisted value, then injected config, then
    /// default) and write the result back to `storage`. The token comes
    /// from storage only and is written back only when non-empty.
    pub fn resolve(runtime: &RuntimeConfig, storage: &mut dyn SessionStorage) -> Self {
        let bot_name = first_present([storage.get(KEY_BOT_NAME), runtime.bot_name.clone()])
            .unwrap_or_else(|| DEFAULT_BOT_NAME.to_owned());
        let shop_domain = first_present([storage.get(KEY_SHOPIFY_DOMAIN), runtime.shopify_domain.clone()])
            .unwrap_or_else(|| DEFAULT_SHOP_DOMAIN.to_owned());
        let auth_token = first_present([storage.get(KEY_SHOPIFY_TOKEN)]);

        storage.set(KEY_BOT_NAME, &bot_name);
        storage.set(KEY_SHOPIFY_DOMAIN, &shop_domain);
        if let Some(token) = &auth_token {
            storage.set(KEY_SHOPIFY_TOKEN, token);
        }

        debug!(%bot_name, %shop_domain, has_token = auth_token.is_some(), "session: config resolved");
        Self { bot_name, shop_domain, auth_token }
    }

    /// Token with all but the last four characters hidden, for display.
    #[must_use]
    pub fn masked_token(&self) -> String {
        match &self.auth_token {
            None => "(none)".to_owned(),
            Some(token) => {
                let count = token.chars().count();
                let tail: String = token.chars().skip(count.saturating_sub(4)).collect();
                format!("{}{tail}", "*".repeat(count.saturating_sub(4)))
            }
        }
    }
}

/// Empty strings count as absent, matching how the host treats falsy values.
fn first_present<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates.into_iter().flatten().find(|v| !v.is_empty())
}

// =============================================================================
// CLIENT CONFIG
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server origin; the chat endpoint is `{base_url}/chat`.
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Delay between revealed characters of a bot reply.
    pub reveal_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            reveal_interval: Duration::from_millis(DEFAULT_REVEAL_INTERVAL_MS),
        }
    }
}

impl ClientConfig {
    /// Build client config from environment variables.
    ///
    /// - `SEEP_BASE_URL`: default `http://127.0.0.1:10000`
    /// - `SEEP_REQUEST_TIMEOUT_SECS`: default 30
    /// - `SEEP_CONNECT_TIMEOUT_SECS`: default 10
    /// - `SEEP_REVEAL_INTERVAL_MS`: default 20
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("SEEP_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        Self {
            base_url: normalize_base_url(&base_url),
            request_timeout: Duration::from_secs(env_parse_u64(
                "SEEP_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )),
            connect_timeout: Duration::from_secs(env_parse_u64(
                "SEEP_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
            reveal_interval: Duration::from_millis(env_parse_u64("SEEP_REVEAL_INTERVAL_MS", DEFAULT_REVEAL_INTERVAL_MS)),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    #[must_use]
    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.base_url)
    }

    #[must_use]
    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}
