use crate::domain::{Notification, NotificationLayout, NotificationSink};

// Console-backed toasts for contexts without a visual notification surface.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: Notification) {
        let duration_ms = notification.duration.as_millis() as u64;
        match notification.layout {
            NotificationLayout::Single => {
                tracing::warn!(target: "toast", duration_ms, "{}", notification.message);
            }
            NotificationLayout::List => {
                // One event per line keeps JSON logs greppable.
                for line in notification.message.lines() {
                    tracing::warn!(target: "toast", duration_ms, "{line}");
                }
            }
        }
    }
}

// Drops every toast; used by background jobs that only care about the global handler.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotificationSink;

impl NotificationSink for NoopNotificationSink {
    fn notify(&self, _notification: Notification) {}
}
