use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

// Why a call never produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportReason {
    Timeout,
    Connect,
    Other,
}

// A failed backend call as handed over by the transport layer.
#[derive(Debug, Clone)]
pub enum ApiFailure {
    // No response was received.
    Transport {
        reason: TransportReason,
        detail: String,
    },
    // The backend answered with a non-success status; body is kept when it was JSON.
    Response { status: u16, body: Option<Value> },
    // The backend answered successfully but the body did not match the expected shape.
    Decode { status: u16, detail: String },
}

impl ApiFailure {
    pub fn transport(reason: TransportReason, detail: impl Into<String>) -> Self {
        ApiFailure::Transport {
            reason,
            detail: detail.into(),
        }
    }

    pub fn response(status: u16, body: Option<Value>) -> Self {
        ApiFailure::Response { status, body }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiFailure::Transport { .. } => None,
            ApiFailure::Response { status, .. } | ApiFailure::Decode { status, .. } => {
                Some(*status)
            }
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiFailure::Response { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailure::Transport { reason, detail } => {
                write!(f, "api transport error ({reason:?}): {detail}")
            }
            ApiFailure::Response { status, body } => match body {
                Some(body) => write!(f, "api upstream error {status}: {body}"),
                None => write!(f, "api upstream error {status}"),
            },
            ApiFailure::Decode { status, detail } => {
                write!(f, "api response decode error ({status}): {detail}")
            }
        }
    }
}

impl std::error::Error for ApiFailure {}

/// Canonical shape derived from any failed call.
///
/// Built fresh for each failure and dropped once the interceptor has
/// dispatched it to its handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedError {
    pub message: String,
    pub validation_errors: Option<IndexMap<String, String>>,
    pub status: Option<u16>,
    pub code: Option<String>,
}

impl NormalizedError {
    pub fn has_validation_errors(&self) -> bool {
        self.validation_errors
            .as_ref()
            .is_some_and(|errors| !errors.is_empty())
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{status}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

// Raised by a field handler that could not render a delivered field error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHandlerError(String);

impl FieldHandlerError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl fmt::Display for FieldHandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field handler failed: {}", self.0)
    }
}

impl std::error::Error for FieldHandlerError {}
