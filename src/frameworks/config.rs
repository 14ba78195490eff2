use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{env, fmt, fs, time::Duration};

use crate::domain::FieldLabels;

// Runtime settings for the front-end's API layer (not UI theming).

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_TOAST_DURATION_MS: u64 = 5_000;
pub const DEFAULT_TOOLTIP_DURATION_MS: u64 = 4_000;

#[derive(Debug)]
pub enum ConfigError {
    InvalidBaseUrl {
        value: String,
        source: url::ParseError,
    },
    UnsupportedScheme(String),
    LabelsRead {
        path: PathBuf,
        source: std::io::Error,
    },
    LabelsParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBaseUrl { value, source } => {
                write!(f, "API_BASE_URL {value:?} is not a valid url: {source}")
            }
            ConfigError::UnsupportedScheme(value) => {
                write!(f, "API_BASE_URL {value:?} must use http or https")
            }
            ConfigError::LabelsRead { path, source } => {
                write!(f, "failed to read field labels {}: {source}", path.display())
            }
            ConfigError::LabelsParse { path, source } => {
                write!(f, "failed to parse field labels {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidBaseUrl { source, .. } => Some(source),
            ConfigError::UnsupportedScheme(_) => None,
            ConfigError::LabelsRead { source, .. } => Some(source),
            ConfigError::LabelsParse { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrontendConfig {
    pub api_base_url: String,
    pub api_timeout: Duration,
    pub api_token: Option<String>,
    pub toast_duration: Duration,
    pub tooltip_duration: Duration,
    pub field_labels: FieldLabels,
}

impl FrontendConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: api_base_url()?,
            api_timeout: api_timeout(),
            api_token: env::var("API_TOKEN").ok().filter(|token| !token.is_empty()),
            toast_duration: toast_duration(),
            tooltip_duration: tooltip_duration(),
            field_labels: field_labels()?,
        })
    }
}

pub fn api_base_url() -> Result<String, ConfigError> {
    let value = env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
    validate_base_url(&value)
}

pub fn api_timeout() -> Duration {
    millis_or(env::var("API_TIMEOUT_MS").ok(), DEFAULT_API_TIMEOUT_MS)
}

pub fn toast_duration() -> Duration {
    millis_or(env::var("TOAST_DURATION_MS").ok(), DEFAULT_TOAST_DURATION_MS)
}

pub fn tooltip_duration() -> Duration {
    millis_or(env::var("TOOLTIP_DURATION_MS").ok(), DEFAULT_TOOLTIP_DURATION_MS)
}

// Built-in labels, extended by the TOML file named in FIELD_LABELS_PATH.
pub fn field_labels() -> Result<FieldLabels, ConfigError> {
    match env::var("FIELD_LABELS_PATH") {
        Ok(path) if !path.is_empty() => load_field_labels(Path::new(&path)),
        _ => Ok(FieldLabels::default()),
    }
}

pub fn load_field_labels(path: &Path) -> Result<FieldLabels, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::LabelsRead {
        path: path.to_path_buf(),
        source,
    })?;
    let file: LabelsFile = toml::from_str(&raw).map_err(|source| ConfigError::LabelsParse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), count = file.labels.len(), "field labels loaded.");
    let mut labels = FieldLabels::default();
    labels.extend(file.labels);
    Ok(labels)
}

// Layout of the labels file:
//
// [labels]
// voucherCode = "Voucher"
#[derive(Debug, Deserialize)]
struct LabelsFile {
    #[serde(default)]
    labels: HashMap<String, String>,
}

fn validate_base_url(value: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(value).map_err(|source| ConfigError::InvalidBaseUrl {
        value: value.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(value.to_string()));
    }
    Ok(value.trim_end_matches('/').to_string())
}

fn millis_or(value: Option<String>, default_ms: u64) -> Duration {
    let millis = value
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default_ms);
    Duration::from_millis(millis)
}
