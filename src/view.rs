//! View seam between the widget and whatever displays it.
//!
//! DESIGN
//! ======
//! The widget never touches a document or terminal directly. It reads and
//! clears the text input, toggles the busy indicator, appends entries,
//! appends revealed text into an existing entry, and asks for the list to
//! be scrolled to the latest content. `TerminalView` implements the seam
//! on a line-oriented writer for the CLI.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use std::io::Write;

use tracing::warn;

use crate::message::{MessageId, Sender};
use crate::render::Entry;

/// Minimal display surface driven by `ChatWidget`.
pub trait ChatView {
    /// Current text-input value.
    fn input_value(&self) -> String;
    fn clear_input(&mut self);
    /// Show or hide the busy indicator.
    fn set_busy(&mut self, busy: bool);
    fn append_entry(&mut self, entry: &Entry);
    /// Append text to the message-text region of an existing entry.
    fn append_text(&mut self, id: MessageId, text: &str);
    fn scroll_to_latest(&mut self);
}

// =============================================================================
// TERMINAL
// =============================================================================

/// Transcript line kept by `TerminalView`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerminalLine {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    pub timestamp: String,
}

/// Line-oriented view writing to `out` (stdout in the CLI).
///
/// Terminal output is append-only. Text revealed into the entry printed
/// last is written straight through; text for an earlier entry is recorded
/// in the transcript but not re-printed.
pub struct TerminalView<W: Write> {
    out: W,
    input: String,
    busy: bool,
    lines: Vec<TerminalLine>,
    /// Entry whose line is still open on the terminal.
    open: Option<MessageId>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out, input: String::new(), busy: false, lines: Vec::new(), open: None }
    }

    /// Replace the pending input, as if the user typed it.
    pub fn set_input(&mut self, text: &str) {
        text.clone_into(&mut self.input);
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub fn lines(&self) -> &[TerminalLine] {
        &self.lines
    }

    /// Terminate the open line, if any.
    pub fn close_line(&mut self) {
        if self.open.take().is_some() {
            self.write("\n");
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, s: &str) {
        if let Err(e) = self.out.write_all(s.as_bytes()).and_then(|()| self.out.flush()) {
            warn!(error = %e, "view: terminal write failed");
        }
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn input_value(&self) -> String {
        self.input.clone()
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn set_busy(&mut self, busy: bool) {
        if busy == self.busy {
            return;
        }
        self.busy = busy;
        if busy {
            self.close_line();
            self.write("...\r");
        } else {
            self.write("   \r");
        }
    }

    fn append_entry(&mut self, entry: &Entry) {
        self.close_line();
        let line = format!("[{}] {}", entry.message.timestamp, entry.label);
        self.write(&line);
        self.lines.push(TerminalLine {
            id: entry.id(),
            sender: entry.sender(),
            text: entry.label.clone(),
            timestamp: entry.message.timestamp.clone(),
        });
        self.open = Some(entry.id());
    }

    fn append_text(&mut self, id: MessageId, text: &str) {
        let Some(line) = self.lines.iter_mut().rev().find(|l| l.id == id) else {
            return;
        };
        line.text.push_str(text);
        if self.open == Some(id) {
            self.write(text);
        }
    }

    fn scroll_to_latest(&mut self) {
        // A terminal always shows its latest output.
    }
}
