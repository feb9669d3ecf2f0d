//! Error types for the cron crate.
//!
//! Validation itself reports a bare [`ErrorKind`](crate::ErrorKind). These
//! errors come from compiling an expression for evaluation, where a few
//! Quartz limits apply on top of validation.

use crate::field::CronField;
use crate::validate::FieldError;
use std::fmt;

/// Errors from compiling a cron expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CronError {
    /// The expression failed validation.
    Invalid(FieldError),
    /// The expression validates but cannot be evaluated.
    Unsupported {
        field: CronField,
        token: String,
        reason: &'static str,
    },
}

impl fmt::Display for CronError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "invalid cron expression: {err}"),
            Self::Unsupported {
                field,
                token,
                reason,
            } => write!(f, "unsupported {field} value '{token}': {reason}"),
        }
    }
}

impl std::error::Error for CronError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Unsupported { .. } => None,
        }
    }
}

impl From<FieldError> for CronError {
    fn from(err: FieldError) -> Self {
        Self::Invalid(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Validator;

    #[test]
    fn invalid_display_includes_key() {
        let field_error = Validator::new()
            .diagnose("0 0 25 * * ?")
            .expect_err("should fail");
        let err = CronError::from(field_error);
        assert!(err.to_string().contains("outOfRange"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn unsupported_display_names_field() {
        let err = CronError::Unsupported {
            field: CronField::DayOfWeek,
            token: "9#2".to_string(),
            reason: "day-of-week must be between 1 and 7",
        };
        assert_eq!(
            err.to_string(),
            "unsupported day-of-week value '9#2': day-of-week must be between 1 and 7"
        );
    }
}
