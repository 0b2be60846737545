//! Transient on-screen notifications.
//!
//! An explicit observable owned by the composition root and injected where
//! needed, replacing the original application's module-level listener
//! arrays. UI layers subscribe; services push.

use std::time::Duration;

use tokio::sync::broadcast;

use crate::error::ClientError;

/// How long a toast stays on screen before auto-dismissal.
pub const TOAST_DISMISS_AFTER: Duration = Duration::from_secs(5);

/// Default capacity of the toast channel.
const DEFAULT_CAPACITY: usize = 32;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    /// A confirmation.
    Success,
    /// A surfaced error.
    Error,
    /// Neutral information.
    Info,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Severity, driving the rendering.
    pub level: ToastLevel,
    /// The message shown to the user.
    pub message: String,
}

/// The toast dispatcher.
///
/// Dropping every receiver simply makes pushes go nowhere; emitting is
/// never an error worth surfacing.
pub struct ToastCenter {
    tx: broadcast::Sender<Toast>,
}

impl ToastCenter {
    /// Creates a dispatcher with the given channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribes to future toasts.
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.tx.subscribe()
    }

    /// Pushes a toast to every subscriber.
    pub fn push(&self, level: ToastLevel, message: impl Into<String>) {
        let toast = Toast {
            level,
            message: message.into(),
        };
        // No subscribers is fine.
        let _ = self.tx.send(toast);
    }

    /// Pushes a success toast.
    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    /// Pushes an error toast.
    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    /// Surfaces a client error as an error toast, using its normalized
    /// user-facing message.
    pub fn surface(&self, error: &ClientError) {
        self.error(error.detail());
    }
}

impl Default for ToastCenter {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}
