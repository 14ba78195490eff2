use async_trait::async_trait;

use crate::domain::SessionInvalidator;

// Used when no auth collaborator is wired in.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSessionInvalidator;

#[async_trait]
impl SessionInvalidator for NoopSessionInvalidator {
    async fn invalidate_session(&self) {}
}

// Logs the rejection; the CLI has no stored session to drop.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSessionInvalidator;

#[async_trait]
impl SessionInvalidator for TracingSessionInvalidator {
    async fn invalidate_session(&self) {
        tracing::warn!("backend rejected the session; sign in again.");
    }
}
