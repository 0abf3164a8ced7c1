//! Runtime configuration read from the environment.
//!
//! | Variable         | Values               | Default    |
//! |------------------|----------------------|------------|
//! | `LOG_FORMAT`     | `json`, `pretty`     | `json`     |
//! | `EVENT_ENCODING` | `identity`, `json`   | `identity` |
//!
//! `RUST_LOG` is read separately by the tracing filter.

use std::str::FromStr;

use crate::error::AppError;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(AppError::Config(format!(
                "LOG_FORMAT must be `json` or `pretty`, got `{other}`"
            ))),
        }
    }
}

/// How the list event store keeps its records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventEncoding {
    /// Events are stored as they are.
    #[default]
    Identity,
    /// Events are stored as `StoredEvent` rows.
    Json,
}

impl FromStr for EventEncoding {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "identity" => Ok(Self::Identity),
            "json" => Ok(Self::Json),
            other => Err(AppError::Config(format!(
                "EVENT_ENCODING must be `identity` or `json`, got `{other}`"
            ))),
        }
    }
}

/// Demo runner configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemoConfig {
    /// Tracing output format.
    pub log_format: LogFormat,
    /// Transcoder wired into the event store.
    pub event_encoding: EventEncoding,
}

impl DemoConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an unsupported value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`; unset variables take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an unsupported value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let log_format = lookup("LOG_FORMAT")
            .map(|value| value.parse::<LogFormat>())
            .transpose()?
            .unwrap_or_default();
        let event_encoding = lookup("EVENT_ENCODING")
            .map(|value| value.parse::<EventEncoding>())
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            log_format,
            event_encoding,
        })
    }
}
