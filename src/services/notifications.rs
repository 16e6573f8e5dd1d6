use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

/// Opaque reference to a loading notification so the caller can dismiss it
/// once the operation settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationHandle(Uuid);

impl NotificationHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Transient user-facing message sink.
///
/// Implementations render toasts, status bars or log lines; the core only
/// raises messages and never renders them. Calls are fire-and-forget and
/// ordering-insensitive.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify_success(&self, title: &str, detail: &str);

    async fn notify_error(&self, title: &str, detail: &str);

    async fn notify_info(&self, title: &str, detail: &str);

    /// Raises a persistent "in progress" message; the returned handle feeds
    /// [`NotificationSink::dismiss`].
    async fn notify_loading(&self, title: &str, detail: &str) -> NotificationHandle;

    async fn dismiss(&self, handle: NotificationHandle);
}

/// Sink that forwards every notification to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

#[async_trait]
impl NotificationSink for TracingNotificationSink {
    async fn notify_success(&self, title: &str, detail: &str) {
        info!(title, detail, "notification: success");
    }

    async fn notify_error(&self, title: &str, detail: &str) {
        error!(title, detail, "notification: error");
    }

    async fn notify_info(&self, title: &str, detail: &str) {
        info!(title, detail, "notification: info");
    }

    async fn notify_loading(&self, title: &str, detail: &str) -> NotificationHandle {
        let handle = NotificationHandle::new();
        info!(title, detail, handle = %handle.0, "notification: loading");
        handle
    }

    async fn dismiss(&self, handle: NotificationHandle) {
        info!(handle = %handle.0, "notification dismissed");
    }
}
