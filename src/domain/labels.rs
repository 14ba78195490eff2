use std::collections::HashMap;

// Labels for field names used by the booking, signup and profile forms.
const BUILT_IN_LABELS: &[(&str, &str)] = &[
    ("nomeCompleto", "Full name"),
    ("fullName", "Full name"),
    ("nome", "Name"),
    ("name", "Name"),
    ("email", "E-mail"),
    ("cpf", "Tax ID (CPF)"),
    ("telefone", "Phone"),
    ("phone", "Phone"),
    ("dataNascimento", "Date of birth"),
    ("birthDate", "Date of birth"),
    ("senha", "Password"),
    ("password", "Password"),
    ("confirmarSenha", "Password confirmation"),
    ("confirmPassword", "Password confirmation"),
    ("quantidadePessoas", "Number of travelers"),
    ("numberOfPeople", "Number of travelers"),
    ("dataPasseio", "Tour date"),
    ("tourDate", "Tour date"),
];

/// Maps backend field identifiers to the labels shown to users.
///
/// Lookups fall back to [`humanize`] for fields without an explicit label.
#[derive(Debug, Clone)]
pub struct FieldLabels {
    overrides: HashMap<String, String>,
}

impl Default for FieldLabels {
    fn default() -> Self {
        Self {
            overrides: BUILT_IN_LABELS
                .iter()
                .map(|(field, label)| (field.to_string(), label.to_string()))
                .collect(),
        }
    }
}

impl FieldLabels {
    // Table without the built-in labels.
    pub fn empty() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    pub fn with_label(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.overrides.insert(field.into(), label.into());
        self
    }

    pub fn extend<I, K, V>(&mut self, labels: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.overrides
            .extend(labels.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    pub fn label_for(&self, field: &str) -> String {
        match self.overrides.get(field) {
            Some(label) => label.clone(),
            None => humanize(field),
        }
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

/// Turns an identifier such as `dataPasseio` or `tour_date` into `Data Passeio` / `Tour date`.
pub fn humanize(field: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in field.chars() {
        if matches!(c, '_' | '-' | '.') || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }

        // Lower-to-upper (or digit-to-upper) is a word boundary.
        if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    let joined = words.join(" ");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
