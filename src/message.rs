//! Chat message model.
//!
//! A `Message` is created when an entry is rendered and never changes
//! afterwards. Nothing here is persisted; the transcript lives only in the
//! view for the lifetime of the widget.

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use std::fmt;

use time::OffsetDateTime;
use time::macros::format_description;

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// CSS-style class name the entry is tagged with.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

/// Identity of a rendered entry. Allocated by the widget in render order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// A single rendered chat message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    /// Message body. For bot messages this is the sanitized text.
    pub text: String,
    /// Local wall-clock time at render, `HH:MM`.
    pub timestamp: String,
}

/// Current local time as `HH:MM`. Falls back to UTC when the local offset
/// cannot be determined (multi-threaded processes on some platforms).
#[must_use]
pub fn timestamp_now() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format_timestamp(now)
}

/// Format a point in time as zero-padded `HH:MM`.
#[must_use]
pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(format_description!("[hour]:[minute]"))
        .unwrap_or_else(|_| format!("{:02}:{:02}", at.hour(), at.minute()))
}
