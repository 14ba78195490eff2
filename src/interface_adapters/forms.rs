use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::{FieldErrorHandler, FieldHandlerError};
use crate::interface_adapters::ids::form_instance_id;
use crate::use_cases::field_errors::FieldErrorRegistry;
use crate::use_cases::interceptor::ErrorInterceptor;

/// Connects one mounted form to the interceptor.
///
/// The form's handler claims only the fields it renders and records them in
/// the form's [`FieldErrorRegistry`]. Dropping the binding unregisters the
/// handler, so an unmounted form can never leak its slot.
pub struct FormBinding {
    form_id: String,
    interceptor: Arc<ErrorInterceptor>,
    registry: Arc<Mutex<FieldErrorRegistry>>,
    handler: FieldErrorHandler,
}

impl FormBinding {
    pub fn bind<I, S>(
        interceptor: Arc<ErrorInterceptor>,
        form_id: impl Into<String>,
        fields: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let form_id = form_id.into();
        let registry = Arc::new(Mutex::new(FieldErrorRegistry::new()));
        let fields: HashSet<String> = fields.into_iter().map(Into::into).collect();

        let target = Arc::clone(&registry);
        let handler: FieldErrorHandler = Arc::new(
            move |field: &str, message: &str| -> Result<bool, FieldHandlerError> {
                if !fields.contains(field) {
                    return Ok(false);
                }
                let mut registry = target
                    .lock()
                    .map_err(|_| FieldHandlerError::new("form registry lock poisoned"))?;
                registry.show_field_error(field, message);
                Ok(true)
            },
        );

        interceptor.register_field_error_handler(form_id.clone(), Arc::clone(&handler));
        tracing::debug!(%form_id, "form bound to error interceptor.");

        Self {
            form_id,
            interceptor,
            registry,
            handler,
        }
    }

    // Bind under a fresh id so several copies of the same form can coexist.
    pub fn bind_instance<I, S>(interceptor: Arc<ErrorInterceptor>, prefix: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::bind(interceptor, form_instance_id(prefix), fields)
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn registry(&self) -> Arc<Mutex<FieldErrorRegistry>> {
        Arc::clone(&self.registry)
    }

    pub fn snapshot(&self) -> FieldErrorRegistry {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for FormBinding {
    fn drop(&mut self) {
        // A newer binding may have taken over the id; leave it in place.
        self.interceptor
            .release_field_error_handler(&self.form_id, &self.handler);
        tracing::debug!(form_id = %self.form_id, "form unbound from error interceptor.");
    }
}
