use indexmap::IndexMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use crate::domain::{
    ApiFailure, FieldErrorHandler, FieldLabels, GlobalErrorHandler, NormalizedError, Notification,
    NotificationLayout, NotificationSink, NotificationStyle,
};
use crate::use_cases::normalize::normalize;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(5000);

// Per-call display options for `ErrorInterceptor::handle_error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleOptions {
    pub show_toast: bool,
    pub show_field_errors: bool,
    pub custom_message: Option<String>,
    pub duration: Duration,
}

impl Default for HandleOptions {
    fn default() -> Self {
        Self {
            show_toast: true,
            show_field_errors: true,
            custom_message: None,
            duration: DEFAULT_TOAST_DURATION,
        }
    }
}

impl HandleOptions {
    // Only the global handler runs; callers render feedback themselves.
    pub fn silent() -> Self {
        Self {
            show_toast: false,
            show_field_errors: false,
            ..Self::default()
        }
    }

    pub fn without_toast(mut self) -> Self {
        self.show_toast = false;
        self
    }

    pub fn without_field_errors(mut self) -> Self {
        self.show_field_errors = false;
        self
    }

    pub fn with_custom_message(mut self, message: impl Into<String>) -> Self {
        self.custom_message = Some(message.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Single point where failed backend calls are classified and surfaced.
///
/// One instance is built by the composition root and shared (behind an `Arc`)
/// with the transport layer and with every form that wants field-level errors.
///
/// Field handlers are broadcast to in registration order: every registered
/// handler receives every field/message pair of a failure, and decides itself
/// whether it owns the field.
pub struct ErrorInterceptor {
    sink: Arc<dyn NotificationSink>,
    labels: FieldLabels,
    field_handlers: Mutex<IndexMap<String, FieldErrorHandler>>,
    global_handler: RwLock<Option<GlobalErrorHandler>>,
}

impl ErrorInterceptor {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            sink,
            labels: FieldLabels::default(),
            field_handlers: Mutex::new(IndexMap::new()),
            global_handler: RwLock::new(None),
        }
    }

    pub fn with_labels(mut self, labels: FieldLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn labels(&self) -> &FieldLabels {
        &self.labels
    }

    // Last registration for a form id wins and keeps the id's original slot.
    pub fn register_field_error_handler(
        &self,
        form_id: impl Into<String>,
        handler: FieldErrorHandler,
    ) {
        let form_id = form_id.into();
        if self.handlers().insert(form_id.clone(), handler).is_some() {
            tracing::debug!(%form_id, "field error handler replaced");
        }
    }

    // Removing an unknown form id is a no-op.
    pub fn unregister_field_error_handler(&self, form_id: &str) {
        self.handlers().shift_remove(form_id);
    }

    // Remove the handler only if it is still the one registered under `form_id`.
    pub(crate) fn release_field_error_handler(&self, form_id: &str, handler: &FieldErrorHandler) {
        let mut handlers = self.handlers();
        if handlers
            .get(form_id)
            .is_some_and(|current| Arc::ptr_eq(current, handler))
        {
            handlers.shift_remove(form_id);
        }
    }

    pub fn field_handler_count(&self) -> usize {
        self.handlers().len()
    }

    pub fn set_global_error_handler(&self, handler: GlobalErrorHandler) {
        *self
            .global_handler
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }

    pub fn clear_global_error_handler(&self) {
        *self
            .global_handler
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Surface `failure` to the user and hand it back as the error.
    ///
    /// Never panics and never turns the failure into a success: the caller
    /// always gets `Err(failure)` after the side effects ran.
    pub fn handle_error<T>(
        &self,
        failure: ApiFailure,
        options: &HandleOptions,
    ) -> Result<T, ApiFailure> {
        let normalized = normalize(&failure);
        tracing::warn!(
            status = ?normalized.status,
            code = ?normalized.code,
            message = %normalized.message,
            field_errors = normalized.validation_errors.as_ref().map_or(0, IndexMap::len),
            "api call failed"
        );

        self.surface(&normalized, options);
        self.notify_global(&normalized);

        Err(failure)
    }

    fn surface(&self, normalized: &NormalizedError, options: &HandleOptions) {
        match &normalized.validation_errors {
            Some(errors) if options.show_field_errors && !errors.is_empty() => {
                let claimed = self.broadcast(errors);
                if !claimed && options.show_toast {
                    self.toast(
                        self.validation_summary(errors),
                        options.duration,
                        layout_for(errors),
                    );
                }
            }
            _ if options.show_toast => {
                let message = options
                    .custom_message
                    .clone()
                    .unwrap_or_else(|| normalized.message.clone());
                self.toast(message, options.duration, NotificationLayout::Single);
            }
            _ => {}
        }
    }

    // Deliver every field error to every handler; true when any handler claimed one.
    fn broadcast(&self, errors: &IndexMap<String, String>) -> bool {
        // Handlers may (un)register while we call into them, so work from a snapshot.
        let snapshot: Vec<(String, FieldErrorHandler)> = self
            .handlers()
            .iter()
            .map(|(form_id, handler)| (form_id.clone(), Arc::clone(handler)))
            .collect();

        let mut claimed = false;
        for (form_id, handler) in snapshot {
            for (field, message) in errors {
                if !self.is_registered(&form_id, &handler) {
                    break;
                }
                match catch_unwind(AssertUnwindSafe(|| handler(field, message))) {
                    Ok(Ok(true)) => claimed = true,
                    Ok(Ok(false)) => {}
                    Ok(Err(error)) => {
                        tracing::error!(%form_id, %field, %error, "field error handler failed");
                    }
                    Err(_) => {
                        tracing::error!(%form_id, %field, "field error handler panicked");
                    }
                }
            }
        }
        claimed
    }

    fn notify_global(&self, normalized: &NormalizedError) {
        let handler = self
            .global_handler
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(handler) = handler {
            if catch_unwind(AssertUnwindSafe(|| handler(normalized))).is_err() {
                tracing::error!("global error handler panicked");
            }
        }
    }

    fn validation_summary(&self, errors: &IndexMap<String, String>) -> String {
        let mut lines = errors
            .iter()
            .map(|(field, message)| format!("{}: {message}", self.labels.label_for(field)));

        if errors.len() == 1 {
            return lines.next().unwrap_or_default();
        }
        let list: Vec<String> = lines.map(|line| format!("• {line}")).collect();
        format!("please fix the following fields:\n{}", list.join("\n"))
    }

    fn toast(&self, message: String, duration: Duration, layout: NotificationLayout) {
        self.sink.notify(Notification {
            message,
            duration,
            style: NotificationStyle::Error,
            layout,
        });
    }

    fn is_registered(&self, form_id: &str, handler: &FieldErrorHandler) -> bool {
        self.handlers()
            .get(form_id)
            .is_some_and(|current| Arc::ptr_eq(current, handler))
    }

    fn handlers(&self) -> MutexGuard<'_, IndexMap<String, FieldErrorHandler>> {
        self.field_handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn layout_for(errors: &IndexMap<String, String>) -> NotificationLayout {
    if errors.len() == 1 {
        NotificationLayout::Single
    } else {
        NotificationLayout::List
    }
}
