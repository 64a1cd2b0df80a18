//! # seep
//!
//! Chat widget for the SEEP shop assistant. The widget sends what the user
//! typed to a `/chat` endpoint and renders the reply next to the user's own
//! message, revealing bot text one character at a time.
//!
//! The controller (`widget::ChatWidget`) is independent of any display or
//! network stack: it talks to a `view::ChatView`, a `transport::ChatTransport`
//! and a `storage::SessionStorage`. The `seep` binary wires it to a terminal,
//! `reqwest`, and a JSON session file.

pub mod config;
pub mod error;
pub mod message;
pub mod render;
pub mod storage;
pub mod transport;
pub mod view;
pub mod widget;

pub use config::{ClientConfig, RuntimeConfig, SessionConfig};
pub use error::{ChatError, StorageError};
pub use message::{Message, MessageId, Sender};
pub use widget::{ChatWidget, FALLBACK_REPLY, SendOutcome};
