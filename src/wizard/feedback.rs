//! Status line and loading indicator
//!
//! A status message is visible for a fixed time after it was shown; a newer
//! message replaces it and restarts the clock. The loading indicator is on
//! while at least one [`LoadingGuard`] is alive.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub expires_at: Instant,
}

impl StatusMessage {
    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct StatusLine {
    current: Option<StatusMessage>,
    timeout: Duration,
}

impl StatusLine {
    pub fn new(timeout: Duration) -> Self {
        Self {
            current: None,
            timeout,
        }
    }

    pub fn show(&mut self, text: impl Into<String>, kind: StatusKind, now: Instant) {
        let text = text.into();
        match kind {
            StatusKind::Success => tracing::info!("{}", text),
            StatusKind::Error => tracing::warn!("{}", text),
        }
        self.current = Some(StatusMessage {
            text,
            kind,
            expires_at: now + self.timeout,
        });
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }

    /// When the current message should be cleared
    pub fn deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(|m| m.expires_at)
    }

    /// Drop the message if its time is up. Returns true if something was cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.current.as_ref().is_some_and(|m| !m.is_visible(now)) {
            self.current = None;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

/// Count of in-flight requests, observable through a watch channel
#[derive(Debug, Clone)]
pub struct LoadingIndicator {
    in_flight: Arc<watch::Sender<usize>>,
}

impl Default for LoadingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingIndicator {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            in_flight: Arc::new(tx),
        }
    }

    /// Turn the indicator on until the returned guard is dropped
    pub fn begin(&self) -> LoadingGuard {
        self.in_flight.send_modify(|n| *n += 1);
        LoadingGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    pub fn is_active(&self) -> bool {
        *self.in_flight.borrow() > 0
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.in_flight.subscribe()
    }
}

#[must_use = "the loading indicator turns off as soon as the guard is dropped"]
pub struct LoadingGuard {
    in_flight: Arc<watch::Sender<usize>>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.in_flight.send_modify(|n| *n = n.saturating_sub(1));
    }
}
