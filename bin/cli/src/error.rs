//! Error types for the command-line tool.

use std::fmt;

/// Errors from running a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// Configuration could not be loaded.
    Config { details: String },
    /// Trigger times could not be previewed.
    Preview { details: String },
    /// Writing to the output failed.
    Output { details: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { details } => write!(f, "failed to load configuration: {details}"),
            Self::Preview { details } => write!(f, "preview failed: {details}"),
            Self::Output { details } => write!(f, "failed to write output: {details}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config {
            details: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Output {
            details: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_error_display() {
        let err = CliError::Preview {
            details: "invalid cron expression".to_string(),
        };
        assert_eq!(err.to_string(), "preview failed: invalid cron expression");
    }

    #[test]
    fn io_error_converts_to_output() {
        let err: CliError = std::io::Error::other("broken pipe").into();
        assert!(matches!(err, CliError::Output { .. }));
        assert!(err.to_string().contains("broken pipe"));
    }
}
