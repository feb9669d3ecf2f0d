//! Command-line configuration.
//!
//! Loaded via the `config` crate from an optional TOML file, then from
//! `ORTH_CRON_*` environment variables. Nested keys use `__`, so
//! `ORTH_CRON_PREVIEW__ZONE=utc` sets `preview.zone`.

use orth_cron::{DayExclusivity, Validator};
use orth_scheduler::PreviewSettings;
use serde::Deserialize;
use std::path::Path;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "ORTH_CRON";

/// Configuration for the `orth-cron` binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CliConfig {
    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default)]
    pub preview: PreviewSettings,

    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Validation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ValidationConfig {
    /// Also reject expressions that constrain both day fields.
    #[serde(default)]
    pub strict: bool,
}

impl ValidationConfig {
    /// Builds the validator these settings describe.
    #[must_use]
    pub fn validator(self) -> Validator {
        let day_exclusivity = if self.strict {
            DayExclusivity::Strict
        } else {
            DayExclusivity::Lenient
        };
        Validator::new().with_day_exclusivity(day_exclusivity)
    }
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            preview: PreviewSettings::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from `file` (if given) and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value is invalid.
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::from_sources(file, environment())
    }

    fn from_sources(
        file: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }
        builder.add_source(env).build()?.try_deserialize()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
