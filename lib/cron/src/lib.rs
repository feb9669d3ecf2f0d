//! Quartz-dialect cron expressions for orth job schedules.
//!
//! This crate provides:
//!
//! - **Validator**: Total, field-by-field validation with a closed error taxonomy
//! - **Expression**: Compiled expressions that compute upcoming fire times
//! - **Presets**: The named schedules offered when configuring a job

pub mod error;
pub mod expression;
pub mod field;
pub mod preset;
pub mod validate;

pub use error::CronError;
pub use expression::{CronExpression, FireTimes};
pub use field::CronField;
pub use preset::{CronPreset, PRESETS};
pub use validate::{DayExclusivity, ErrorKind, FieldError, Validator, validate};
