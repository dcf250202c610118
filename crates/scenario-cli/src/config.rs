//! Configuration read from the environment.

use std::time::Duration;

use scenario_playback::application::player::{DEFAULT_FEEDBACK_INTERVAL, PlaybackConfig};

use crate::error::AppError;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Settings for the `scenario` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    /// Feedback pause after a response is chosen.
    pub feedback_interval: Duration,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feedback_interval: DEFAULT_FEEDBACK_INTERVAL,
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Reads `SCENARIO_FEEDBACK_MS` and `SCENARIO_LOG_FORMAT`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if either variable is set to an invalid
    /// value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable's value
    /// if it is set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let feedback_interval = match lookup("SCENARIO_FEEDBACK_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| {
                    AppError::Config(format!("SCENARIO_FEEDBACK_MS must be a valid u64: {e}"))
                })?,
            None => DEFAULT_FEEDBACK_INTERVAL,
        };

        let log_format = match lookup("SCENARIO_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("" | "pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "SCENARIO_LOG_FORMAT must be `json` or `pretty`, got `{other}`"
                )));
            }
        };

        Ok(Self {
            feedback_interval,
            log_format,
        })
    }

    #[must_use]
    pub fn playback(&self) -> PlaybackConfig {
        PlaybackConfig {
            feedback_interval: self.feedback_interval,
        }
    }
}
