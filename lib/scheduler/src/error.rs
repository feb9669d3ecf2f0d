//! Error types for the scheduler crate.
//!
//! Errors are designed for layered context using rootcause: preview
//! sources return `Report<ScheduleError>`, and callers wrap as needed.

use std::fmt;

/// Errors from schedule operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Schedule type name is not one of `NONE`, `CRON`, `FIX_RATE`.
    UnknownScheduleType { name: String },
    /// Invalid cron expression.
    InvalidCronExpression { expression: String, reason: String },
    /// Fixed-rate configuration is not a positive number of seconds.
    InvalidFixRate { conf: String },
    /// Invalid timezone.
    InvalidTimezone { timezone: String },
    /// A trigger-time source returned a sequence that breaks the contract.
    ContractViolation { reason: String },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownScheduleType { name } => write!(f, "unknown schedule type: {name}"),
            Self::InvalidCronExpression { expression, reason } => {
                write!(f, "invalid cron expression '{expression}': {reason}")
            }
            Self::InvalidFixRate { conf } => {
                write!(f, "invalid fixed-rate interval '{conf}': expected positive seconds")
            }
            Self::InvalidTimezone { timezone } => {
                write!(f, "invalid timezone: {timezone}")
            }
            Self::ContractViolation { reason } => {
                write!(f, "trigger-time source broke its contract: {reason}")
            }
        }
    }
}

impl std::error::Error for ScheduleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_error_display() {
        let err = ScheduleError::InvalidCronExpression {
            expression: "0 0 25 * * ?".to_string(),
            reason: "outOfRange".to_string(),
        };
        assert!(err.to_string().contains("0 0 25 * * ?"));
        assert!(err.to_string().contains("outOfRange"));
    }

    #[test]
    fn fix_rate_error_display() {
        let err = ScheduleError::InvalidFixRate {
            conf: "-5".to_string(),
        };
        assert!(err.to_string().contains("'-5'"));
    }

    #[test]
    fn unknown_type_display() {
        let err = ScheduleError::UnknownScheduleType {
            name: "FIX_DELAY".to_string(),
        };
        assert_eq!(err.to_string(), "unknown schedule type: FIX_DELAY");
    }
}
