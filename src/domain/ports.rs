use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::errors::{FieldHandlerError, NormalizedError};

/// Callback registered by a form to render one field error.
///
/// Returns `Ok(true)` when the form owns the field and displayed it, `Ok(false)`
/// when the field is not part of the form.
pub type FieldErrorHandler =
    Arc<dyn Fn(&str, &str) -> Result<bool, FieldHandlerError> + Send + Sync>;

// Cross-cutting callback invoked once for every handled failure.
pub type GlobalErrorHandler = Arc<dyn Fn(&NormalizedError) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStyle {
    Error,
}

// Single-line message or a list of field errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLayout {
    Single,
    List,
}

// Toast request handed to the notification sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub duration: Duration,
    pub style: NotificationStyle,
    pub layout: NotificationLayout,
}

// The interceptor depends on this port, not on a concrete toast renderer.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

// Port owned by the auth collaborator; called when the backend rejects the session.
#[async_trait]
pub trait SessionInvalidator: Send + Sync {
    async fn invalidate_session(&self);
}
