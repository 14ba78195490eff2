mod errors;
mod labels;
mod ports;

// Re-export the domain boundary types and ports.
pub use errors::{ApiFailure, FieldHandlerError, NormalizedError, TransportReason};
pub use labels::{FieldLabels, humanize};
pub use ports::{
    FieldErrorHandler, GlobalErrorHandler, Notification, NotificationLayout, NotificationSink,
    NotificationStyle, SessionInvalidator,
};
