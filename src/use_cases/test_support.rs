use std::sync::{Arc, Mutex};

use crate::domain::{
    FieldErrorHandler, FieldHandlerError, GlobalErrorHandler, NormalizedError, Notification,
    NotificationSink,
};

// Sink that keeps every toast so tests can assert on what users would see.
#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub(crate) fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .expect("notifications mutex poisoned")
            .clone()
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|notification| notification.message)
            .collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .expect("notifications mutex poisoned")
            .push(notification);
    }
}

pub(crate) type Deliveries = Arc<Mutex<Vec<(String, String)>>>;

// Field handler that claims only `accepted` fields and records every call.
pub(crate) fn recording_field_handler(accepted: &[&str]) -> (FieldErrorHandler, Deliveries) {
    let accepted: Vec<String> = accepted.iter().map(|field| field.to_string()).collect();
    let deliveries: Deliveries = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&deliveries);
    let handler: FieldErrorHandler = Arc::new(move |field, message| {
        seen.lock()
            .expect("deliveries mutex poisoned")
            .push((field.to_string(), message.to_string()));
        Ok(accepted.iter().any(|known| known == field))
    });
    (handler, deliveries)
}

// Field handler that always reports a rendering failure.
pub(crate) fn failing_field_handler() -> FieldErrorHandler {
    Arc::new(|_, _| Err(FieldHandlerError::new("tooltip target missing")))
}

pub(crate) type GlobalCalls = Arc<Mutex<Vec<NormalizedError>>>;

pub(crate) fn recording_global_handler() -> (GlobalErrorHandler, GlobalCalls) {
    let calls: GlobalCalls = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&calls);
    let handler: GlobalErrorHandler = Arc::new(move |error| {
        seen.lock()
            .expect("global calls mutex poisoned")
            .push(error.clone());
    });
    (handler, calls)
}
