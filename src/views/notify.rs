//! Transient user-facing messages.

use std::time::Duration;

use parking_lot::Mutex;
use tracing::info;

/// Label of the dismiss action on every toast
pub const CLOSE_ACTION: &str = "Close";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub action: String,
    pub duration: Duration,
}

/// Where views send their toasts
pub trait Notifier: Send + Sync {
    fn open(&self, toast: Toast);
}

/// Notifier that logs each toast and keeps it for later inspection
#[derive(Debug, Default)]
pub struct ToastLog {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.toasts.lock().iter().map(|t| t.message.clone()).collect()
    }
}

impl Notifier for ToastLog {
    fn open(&self, toast: Toast) {
        info!(message = %toast.message, duration_ms = toast.duration.as_millis() as u64, "Toast");
        self.toasts.lock().push(toast);
    }
}
