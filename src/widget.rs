//! Chat widget controller.
//!
//! DESIGN
//! ======
//! `ChatWidget` owns the view, the transport, the resolved session config,
//! and the running reveals. `send` is the whole pipeline: read and trim the
//! input, render the user entry, clear the input, show the busy indicator,
//! make one request, hide the indicator, render the reply or the fallback.
//!
//! CONCURRENCY
//! ===========
//! `send` takes `&mut self`, so a second send cannot start while one is in
//! flight. The busy indicator is hidden by a drop guard, which also covers
//! a send future that is dropped mid-request. Reveals advance only when
//! `tick` is called; `run_reveals` calls it on a timer.

#[cfg(test)]
#[path = "widget_test.rs"]
mod widget_test;

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, RuntimeConfig, SessionConfig};
use crate::message::{MessageId, Sender};
use crate::render::{RevealSet, Renderer};
use crate::storage::SessionStorage;
use crate::transport::ChatTransport;
use crate::view::ChatView;

/// Bot text shown for every failed exchange, whatever went wrong.
pub const FALLBACK_REPLY: &str = "SEEP is sleeping...";

/// Result of one `send` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was empty after trimming; nothing rendered, nothing sent.
    Ignored,
    /// The server's reply was rendered into this entry.
    Replied(MessageId),
    /// The exchange failed and the fallback was rendered into this entry.
    Failed(MessageId),
}

pub struct ChatWidget<V, T> {
    view: V,
    transport: T,
    session: SessionConfig,
    renderer: Renderer,
    reveals: RevealSet,
    reveal_interval: Duration,
}

impl<V: ChatView, T: ChatTransport> ChatWidget<V, T> {
    #[must_use]
    pub fn new(session: SessionConfig, view: V, transport: T) -> Self {
        let renderer = Renderer::new(session.bot_name.clone());
        Self {
            view,
            transport,
            session,
            renderer,
            reveals: RevealSet::new(),
            reveal_interval: ClientConfig::default().reveal_interval,
        }
    }

    /// Resolve the session config against `storage` and build the widget.
    pub fn create(runtime: &RuntimeConfig, storage: &mut dyn SessionStorage, view: V, transport: T) -> Self {
        Self::new(SessionConfig::resolve(runtime, storage), view, transport)
    }

    #[must_use]
    pub fn with_reveal_interval(mut self, interval: Duration) -> Self {
        self.reveal_interval = interval;
        self
    }

    #[must_use]
    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    #[must_use]
    pub fn reveals(&self) -> &RevealSet {
        &self.reveals
    }

    // =========================================================================
    // SEND PIPELINE
    // =========================================================================

    /// Send the current input value.
    pub async fn send(&mut self) -> SendOutcome {
        let text = self.view.input_value().trim().to_owned();
        if text.is_empty() {
            debug!("chat: empty input ignored");
            return SendOutcome::Ignored;
        }

        self.append(Sender::User, &text);
        self.view.clear_input();

        let result = {
            let _busy = BusyGuard::show(&mut self.view);
            info!(prompt_len = text.len(), "chat: prompt sent");
            self.transport.send_prompt(&text).await
        };

        match result {
            Ok(reply) => {
                info!(reply_len = reply.len(), "chat: reply received");
                SendOutcome::Replied(self.append(Sender::Bot, &reply))
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), retryable = e.retryable(), "chat: exchange failed");
                SendOutcome::Failed(self.append(Sender::Bot, FALLBACK_REPLY))
            }
        }
    }

    /// Key press in the text input. Enter sends; other keys do nothing.
    pub async fn on_key(&mut self, key: &str) -> Option<SendOutcome> {
        if key == "Enter" { Some(self.send().await) } else { None }
    }

    // =========================================================================
    // RENDERER
    // =========================================================================

    /// Append one entry and scroll to it. Bot text starts revealing on the
    /// next `tick`.
    pub fn append(&mut self, sender: Sender, text: &str) -> MessageId {
        let id = match sender {
            Sender::User => {
                let entry = self.renderer.user_entry(text);
                self.view.append_entry(&entry);
                entry.id()
            }
            Sender::Bot => {
                let (entry, reveal) = self.renderer.bot_entry(text);
                self.view.append_entry(&entry);
                self.reveals.start(entry.id(), reveal);
                entry.id()
            }
        };
        self.view.scroll_to_latest();
        id
    }

    /// Reveal one more character of every running reveal. Returns how many
    /// characters were written.
    pub fn tick(&mut self) -> usize {
        let step = self.reveals.tick();
        let mut buf = [0_u8; 4];
        for (id, c) in &step {
            self.view.append_text(*id, c.encode_utf8(&mut buf));
        }
        step.len()
    }

    /// Drive reveals at the configured interval until none is running.
    pub async fn run_reveals(&mut self) {
        if self.reveals.is_idle() {
            return;
        }
        if self.reveal_interval.is_zero() {
            self.finish_reveals();
            return;
        }
        let mut interval = tokio::time::interval(self.reveal_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;
        while !self.reveals.is_idle() {
            interval.tick().await;
            self.tick();
        }
    }

    /// Show the rest of every running reveal at once.
    pub fn finish_reveals(&mut self) {
        for (id, rest) in self.reveals.finish_all() {
            self.view.append_text(id, &rest);
        }
    }

    pub fn cancel_reveal(&mut self, id: MessageId) -> bool {
        self.reveals.cancel(id)
    }

    /// Stop all reveals. The widget stays usable.
    pub fn teardown(&mut self) -> usize {
        let stopped = self.reveals.cancel_all();
        if stopped > 0 {
            debug!(stopped, "chat: reveals cancelled");
        }
        stopped
    }
}

/// Shows the busy indicator for its lifetime.
struct BusyGuard<'a, V: ChatView> {
    view: &'a mut V,
}

impl<'a, V: ChatView> BusyGuard<'a, V> {
    fn show(view: &'a mut V) -> Self {
        view.set_busy(true);
        Self { view }
    }
}

impl<V: ChatView> Drop for BusyGuard<'_, V> {
    fn drop(&mut self) {
        self.view.set_busy(false);
    }
}
