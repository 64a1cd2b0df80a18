//! Entry rendering and the typing reveal.
//!
//! DESIGN
//! ======
//! `Renderer` turns raw text into an `Entry`: the finished `Message` plus
//! the label the view shows immediately. User entries are complete at once
//! (`You: text`). Bot entries start as `Name: ` and the sanitized body is
//! handed to a `Reveal`, an iterator yielding one character per tick.
//!
//! Reveals are owned by a `RevealSet` keyed by `MessageId`. Nothing here
//! touches a clock: whoever drives the set calls `tick()` at its own pace,
//! so overlapping reveals advance together, each only into its own entry,
//! and any of them can be cancelled.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::BTreeMap;

use crate::message::{Message, MessageId, Sender, timestamp_now};

/// Characters treated as lightweight markdown emphasis.
pub const EMPHASIS_CHARS: [char; 3] = ['*', '_', '`'];

/// Remove every emphasis marker, wherever it occurs.
#[must_use]
pub fn strip_emphasis(text: &str) -> String {
    text.chars().filter(|c| !EMPHASIS_CHARS.contains(c)).collect()
}

// =============================================================================
// ENTRIES
// =============================================================================

/// One visual entry: message-text region plus timestamp region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub message: Message,
    /// Text placed in the message-text region when the entry is appended.
    pub label: String,
}

impl Entry {
    #[must_use]
    pub fn id(&self) -> MessageId {
        self.message.id
    }

    #[must_use]
    pub fn sender(&self) -> Sender {
        self.message.sender
    }
}

/// Builds entries and allocates their ids in render order.
#[derive(Debug)]
pub struct Renderer {
    bot_name: String,
    next_id: u64,
}

impl Renderer {
    #[must_use]
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self { bot_name: bot_name.into(), next_id: 1 }
    }

    #[must_use]
    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    /// Complete user entry.
    pub fn user_entry(&mut self, text: &str) -> Entry {
        let message = self.message(Sender::User, text.to_owned());
        Entry { label: format!("You: {text}"), message }
    }

    /// Bot entry carrying only the name label, plus the reveal for its body.
    pub fn bot_entry(&mut self, text: &str) -> (Entry, Reveal) {
        let body = strip_emphasis(text);
        let reveal = Reveal::new(&body);
        let message = self.message(Sender::Bot, body);
        (Entry { label: format!("{}: ", self.bot_name), message }, reveal)
    }

    fn message(&mut self, sender: Sender, text: String) -> Message {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        Message { id, sender, text, timestamp: timestamp_now() }
    }
}

// =============================================================================
// REVEAL
// =============================================================================

/// Character-by-character reveal of one message body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reveal {
    chars: Vec<char>,
    pos: usize,
}

impl Reveal {
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self { chars: text.chars().collect(), pos: 0 }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.chars.len() - self.pos
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.remaining() == 0
    }

    /// Everything not yet revealed, consuming it.
    pub fn finish(&mut self) -> String {
        let rest: String = self.chars[self.pos..].iter().collect();
        self.pos = self.chars.len();
        rest
    }
}

impl Iterator for Reveal {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        Some(c)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

/// Running reveals keyed by the entry they write into.
#[derive(Debug, Default)]
pub struct RevealSet {
    active: BTreeMap<MessageId, Reveal>,
}

impl RevealSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a reveal. Empty reveals finish immediately and are not kept.
    pub fn start(&mut self, id: MessageId, reveal: Reveal) {
        if !reveal.is_done() {
            self.active.insert(id, reveal);
        }
    }

    /// Advance every active reveal by one character, oldest entry first.
    /// Finished reveals are dropped.
    pub fn tick(&mut self) -> Vec<(MessageId, char)> {
        let mut out = Vec::with_capacity(self.active.len());
        self.active.retain(|id, reveal| {
            if let Some(c) = reveal.next() {
                out.push((*id, c));
            }
            !reveal.is_done()
        });
        out
    }

    /// Stop one reveal, leaving its entry partially shown.
    pub fn cancel(&mut self, id: MessageId) -> bool {
        self.active.remove(&id).is_some()
    }

    /// Stop every reveal. Returns how many were running.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.active.len();
        self.active.clear();
        n
    }

    /// Drain every reveal at once, returning the unrevealed remainder per entry.
    pub fn finish_all(&mut self) -> Vec<(MessageId, String)> {
        std::mem::take(&mut self.active)
            .into_iter()
            .map(|(id, mut reveal)| (id, reveal.finish()))
            .collect()
    }

    #[must_use]
    pub fn is_active(&self, id: MessageId) -> bool {
        self.active.contains_key(&id)
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
