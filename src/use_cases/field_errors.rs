use indexmap::IndexMap;

/// Per-form record of field validation errors and the one field whose
/// tooltip is currently visible.
///
/// `active_field`, when set, always names a key of `errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrorRegistry {
    errors: IndexMap<String, String>,
    active_field: Option<String>,
}

impl FieldErrorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Record (or replace) the error and make the field the visible one.
    pub fn show_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        self.errors.insert(field.clone(), message.into());
        self.active_field = Some(field);
    }

    /// With a field: forget its error. Without one: hide the visible tooltip
    /// but keep every recorded error, so focusing the field again shows it.
    pub fn hide_field_error(&mut self, field: Option<&str>) {
        match field {
            Some(field) => {
                self.errors.shift_remove(field);
                if self.active_field.as_deref() == Some(field) {
                    self.active_field = None;
                }
            }
            None => self.active_field = None,
        }
    }

    pub fn clear_all_errors(&mut self) {
        self.errors.clear();
        self.active_field = None;
    }

    pub fn is_field_error_visible(&self, field: &str) -> bool {
        self.active_field.as_deref() == Some(field) && self.errors.contains_key(field)
    }

    pub fn get_field_error(&self, field: &str) -> &str {
        self.errors.get(field).map(String::as_str).unwrap_or("")
    }

    // Replace every error; the first field in the map becomes the visible one.
    pub fn set_field_errors<I, K, V>(&mut self, errors: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.errors = errors
            .into_iter()
            .map(|(field, message)| (field.into(), message.into()))
            .collect();
        self.active_field = self.errors.keys().next().cloned();
    }

    pub fn active_field(&self) -> Option<&str> {
        self.active_field.as_deref()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_any_errors(&self) -> bool {
        self.has_errors()
    }

    pub fn get_error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn get_all_errors(&self) -> IndexMap<String, String> {
        self.errors.clone()
    }
}
