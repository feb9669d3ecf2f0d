//! Field-by-field validation of Quartz cron expressions.
//!
//! Validation is total: every input, including empty strings and binary
//! garbage, maps to `Ok(())` or exactly one [`ErrorKind`]. The first failing
//! field wins, scanning left to right.

use crate::field::{CronField, parse_number};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an expression was rejected.
///
/// Each kind maps to one rejection rule. [`ErrorKind::key`] is the stable
/// key callers use to look up user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Empty or whitespace-only input.
    Required,
    /// Fewer than 6 or more than 7 fields.
    FieldCount,
    /// `?` outside day-of-month / day-of-week.
    InvalidQuestion,
    /// Step is missing, non-numeric or zero.
    InvalidStep,
    /// Value is neither a number nor an alias valid for its field.
    InvalidValue,
    /// Value or range outside the field bounds, or an inverted range.
    OutOfRange,
    /// Both day fields are `?`.
    BothQuestion,
    /// Both day fields carry a constraint. Only reported in strict mode.
    BothSpecified,
}

impl ErrorKind {
    /// All kinds, in rule order.
    pub const ALL: [ErrorKind; 8] = [
        Self::Required,
        Self::FieldCount,
        Self::InvalidQuestion,
        Self::InvalidStep,
        Self::InvalidValue,
        Self::OutOfRange,
        Self::BothQuestion,
        Self::BothSpecified,
    ];

    /// Returns the message key for this kind.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::FieldCount => "fieldCount",
            Self::InvalidQuestion => "invalidQuestion",
            Self::InvalidStep => "invalidStep",
            Self::InvalidValue => "invalidValue",
            Self::OutOfRange => "outOfRange",
            Self::BothQuestion => "bothQuestion",
            Self::BothSpecified => "bothSpecified",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::error::Error for ErrorKind {}

/// A rejection with the field and token that caused it.
///
/// `field` and `token` are `None` for expression-level errors
/// (`Required`, `FieldCount`, `BothQuestion`, `BothSpecified`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub kind: ErrorKind,
    pub field: Option<CronField>,
    pub token: Option<String>,
}

impl FieldError {
    fn expression(kind: ErrorKind) -> Self {
        Self {
            kind,
            field: None,
            token: None,
        }
    }

    fn at(kind: ErrorKind, field: CronField, token: &str) -> Self {
        Self {
            kind,
            field: Some(field),
            token: Some(token.to_string()),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.field, &self.token) {
            (Some(field), Some(token)) => write!(f, "{} in {field} field '{token}'", self.kind),
            _ => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for FieldError {}

/// How the day-of-month / day-of-week pairing is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayExclusivity {
    /// Only reject both fields being `?`.
    #[default]
    Lenient,
    /// Also reject both fields carrying a constraint (neither `*` nor `?`).
    Strict,
}

/// A configured validator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Validator {
    day_exclusivity: DayExclusivity,
}

impl Validator {
    /// Creates a lenient validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator that enforces Quartz day exclusivity in full.
    #[must_use]
    pub fn strict() -> Self {
        Self::new().with_day_exclusivity(DayExclusivity::Strict)
    }

    /// Sets the day exclusivity mode.
    #[must_use]
    pub fn with_day_exclusivity(mut self, day_exclusivity: DayExclusivity) -> Self {
        self.day_exclusivity = day_exclusivity;
        self
    }

    /// Returns the configured day exclusivity mode.
    #[must_use]
    pub fn day_exclusivity(&self) -> DayExclusivity {
        self.day_exclusivity
    }

    /// Validates an expression, returning only the error kind.
    ///
    /// # Errors
    ///
    /// Returns the kind of the first rule the expression breaks.
    pub fn validate(&self, expression: &str) -> Result<(), ErrorKind> {
        self.diagnose(expression).map_err(|e| e.kind)
    }

    /// Validates an expression, reporting the offending field and token.
    ///
    /// # Errors
    ///
    /// Returns the first rule the expression breaks.
    pub fn diagnose(&self, expression: &str) -> Result<(), FieldError> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(FieldError::expression(ErrorKind::Required));
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        if !(6..=7).contains(&tokens.len()) {
            return Err(FieldError::expression(ErrorKind::FieldCount));
        }

        for (field, token) in CronField::ALL.into_iter().zip(tokens.iter().copied()) {
            check_field(field, token).map_err(|kind| FieldError::at(kind, field, token))?;
        }

        let day_of_month = tokens[CronField::DayOfMonth.index()];
        let day_of_week = tokens[CronField::DayOfWeek.index()];
        if day_of_month == "?" && day_of_week == "?" {
            return Err(FieldError::expression(ErrorKind::BothQuestion));
        }
        if self.day_exclusivity == DayExclusivity::Strict
            && is_constrained(day_of_month)
            && is_constrained(day_of_week)
        {
            return Err(FieldError::expression(ErrorKind::BothSpecified));
        }

        Ok(())
    }
}

/// Validates an expression with the lenient default rules.
///
/// # Errors
///
/// Returns the kind of the first rule the expression breaks.
pub fn validate(expression: &str) -> Result<(), ErrorKind> {
    Validator::new().validate(expression)
}

/// True if a day token narrows the schedule (anything but `*` and `?`).
fn is_constrained(token: &str) -> bool {
    token != "*" && token != "?"
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Whole-field day tokens that skip numeric checks.
fn is_day_token(field: CronField, token: &str) -> bool {
    match field {
        CronField::DayOfMonth => {
            token == "L"
                || token == "LW"
                || token.strip_suffix('W').is_some_and(is_digits)
        }
        CronField::DayOfWeek => {
            token == "L"
                || token.strip_suffix('L').is_some_and(is_digits)
                || token
                    .split_once('#')
                    .is_some_and(|(day, nth)| is_digits(day) && is_digits(nth))
        }
        _ => false,
    }
}

fn check_field(field: CronField, token: &str) -> Result<(), ErrorKind> {
    if is_day_token(field, token) {
        return Ok(());
    }
    if token == "?" {
        return if field.is_day_field() {
            Ok(())
        } else {
            Err(ErrorKind::InvalidQuestion)
        };
    }
    if token == "*" {
        return Ok(());
    }
    token.split(',').try_for_each(|part| check_part(field, part))
}

fn check_part(field: CronField, part: &str) -> Result<(), ErrorKind> {
    if let Some((base, step)) = part.split_once('/') {
        match parse_number(step) {
            Some(n) if n >= 1 => {}
            _ => return Err(ErrorKind::InvalidStep),
        }
        if base == "*" || base.is_empty() {
            return Ok(());
        }
        return check_value(field, base);
    }

    if let Some((lo, hi)) = part.split_once('-') {
        let (Some(lo), Some(hi)) = (field.resolve(lo), field.resolve(hi)) else {
            return Err(ErrorKind::InvalidValue);
        };
        if lo < field.min() || hi > field.max() || lo > hi {
            return Err(ErrorKind::OutOfRange);
        }
        return Ok(());
    }

    check_value(field, part)
}

fn check_value(field: CronField, token: &str) -> Result<(), ErrorKind> {
    let value = field.resolve(token).ok_or(ErrorKind::InvalidValue)?;
    if !field.contains(value) {
        return Err(ErrorKind::OutOfRange);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_six_and_seven_fields() {
        assert_eq!(validate("0 0 12 * * ?"), Ok(()));
        assert_eq!(validate("0 0 12 * * ? 2025"), Ok(()));
    }

    #[test]
    fn validate_rejects_wrong_field_count() {
        assert_eq!(validate("0 0 12 * *"), Err(ErrorKind::FieldCount));
        assert_eq!(validate("0 0 12 * * ? 2025 1"), Err(ErrorKind::FieldCount));
        assert_eq!(validate("INVALID"), Err(ErrorKind::FieldCount));
    }

    #[test]
    fn validate_requires_non_blank_input() {
        assert_eq!(validate(""), Err(ErrorKind::Required));
        assert_eq!(validate("   "), Err(ErrorKind::Required));
        assert_eq!(validate("\t\n"), Err(ErrorKind::Required));
    }

    #[test]
    fn validate_tolerates_surrounding_and_repeated_whitespace() {
        assert_eq!(validate("  0\t0  12 *\n* ?  "), Ok(()));
    }

    #[test]
    fn validate_resolves_weekday_names() {
        assert_eq!(validate("0 0 0 ? * MON-FRI"), Ok(()));
        assert_eq!(validate("0 0 0 ? * 2-6"), Ok(()));
        assert_eq!(validate("0 0 0 ? * mon,wed,fri"), Ok(()));
    }

    #[test]
    fn validate_resolves_month_names_only_in_month_field() {
        assert_eq!(validate("0 0 0 1 JAN-MAR ?"), Ok(()));
        assert_eq!(validate("0 0 0 1 jan/2 ?"), Ok(()));
        assert_eq!(validate("0 0 0 ? JAN MON"), Ok(()));
        assert_eq!(validate("0 0 JAN * * ?"), Err(ErrorKind::InvalidValue));
        assert_eq!(validate("0 0 0 ? MON ?"), Err(ErrorKind::InvalidValue));
    }

    #[test]
    fn validate_rejects_both_question_marks() {
        assert_eq!(validate("0 0 0 ? * ?"), Err(ErrorKind::BothQuestion));
    }

    #[test]
    fn validate_rejects_question_mark_outside_day_fields() {
        assert_eq!(validate("? 0 0 * * ?"), Err(ErrorKind::InvalidQuestion));
        assert_eq!(validate("0 0 0 1 ? ?"), Err(ErrorKind::InvalidQuestion));
        assert_eq!(validate("0 0 0 1 * ? ?"), Err(ErrorKind::InvalidQuestion));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        assert_eq!(validate("0 0 25 * * ?"), Err(ErrorKind::OutOfRange));
        assert_eq!(validate("60 0 0 * * ?"), Err(ErrorKind::OutOfRange));
        assert_eq!(validate("0 0 0 0 * ?"), Err(ErrorKind::OutOfRange));
        assert_eq!(validate("0 0 0 ? * 0"), Err(ErrorKind::OutOfRange));
        assert_eq!(validate("0 0 0 ? * 8"), Err(ErrorKind::OutOfRange));
        assert_eq!(validate("0 0 0 1 13 ?"), Err(ErrorKind::OutOfRange));
        assert_eq!(validate("0 0 0 1 * ? 1969"), Err(ErrorKind::OutOfRange));
        assert_eq!(validate("0 0 0 1 * ? 2100"), Err(ErrorKind::OutOfRange));
    }

    #[test]
    fn validate_treats_huge_numbers_as_out_of_range() {
        assert_eq!(
            validate("99999999999999999999 0 0 * * ?"),
            Err(ErrorKind::OutOfRange)
        );
    }

    #[test]
    fn validate_checks_ranges() {
        assert_eq!(validate("0 0 9-17 * * ?"), Ok(()));
        assert_eq!(validate("0 0 17-9 * * ?"), Err(ErrorKind::OutOfRange));
        assert_eq!(validate("0 0 20-24 * * ?"), Err(ErrorKind::OutOfRange));
        assert_eq!(validate("0 0 a-5 * * ?"), Err(ErrorKind::InvalidValue));
        assert_eq!(validate("0 0 -5 * * ?"), Err(ErrorKind::InvalidValue));
    }

    #[test]
    fn validate_rejects_ranges_with_extra_bounds() {
        assert_eq!(validate("0 0 1-2-3 * * ?"), Err(ErrorKind::InvalidValue));
    }

    #[test]
    fn validate_checks_steps() {
        assert_eq!(validate("*/5 * * * * ?"), Ok(()));
        assert_eq!(validate("1/5 * * * * ?"), Ok(()));
        assert_eq!(validate("/5 * * * * ?"), Ok(()));
        assert_eq!(validate("*/0 * * * * ?"), Err(ErrorKind::InvalidStep));
        assert_eq!(validate("*/00 * * * * ?"), Err(ErrorKind::InvalidStep));
        assert_eq!(validate("*/ * * * * ?"), Err(ErrorKind::InvalidStep));
        assert_eq!(validate("*/x * * * * ?"), Err(ErrorKind::InvalidStep));
        assert_eq!(validate("1/2/3 * * * * ?"), Err(ErrorKind::InvalidStep));
    }

    #[test]
    fn validate_checks_step_base() {
        assert_eq!(validate("61/5 * * * * ?"), Err(ErrorKind::OutOfRange));
        assert_eq!(validate("x/5 * * * * ?"), Err(ErrorKind::InvalidValue));
        assert_eq!(validate("1-5/2 * * * * ?"), Err(ErrorKind::InvalidValue));
    }

    #[test]
    fn validate_reports_step_before_base() {
        assert_eq!(validate("x/0 * * * * ?"), Err(ErrorKind::InvalidStep));
    }

    #[test]
    fn validate_checks_every_list_item() {
        assert_eq!(validate("0 0,15,30,45 * * * ?"), Ok(()));
        assert_eq!(validate("0 0,15,60 * * * ?"), Err(ErrorKind::OutOfRange));
        assert_eq!(validate("0 1,,2 * * * ?"), Err(ErrorKind::InvalidValue));
        assert_eq!(validate("0 1, * * * ?"), Err(ErrorKind::InvalidValue));
        assert_eq!(validate("0 *,5 * * * ?"), Err(ErrorKind::InvalidValue));
    }

    #[test]
    fn validate_accepts_special_day_tokens() {
        assert_eq!(validate("0 0 0 L * ?"), Ok(()));
        assert_eq!(validate("0 0 0 15W * ?"), Ok(()));
        assert_eq!(validate("0 0 0 LW * ?"), Ok(()));
        assert_eq!(validate("0 0 0 ? * L"), Ok(()));
        assert_eq!(validate("0 0 0 ? * 6L"), Ok(()));
        assert_eq!(validate("0 0 0 ? * 6#3"), Ok(()));
    }

    #[test]
    fn validate_rejects_special_tokens_in_wrong_field() {
        assert_eq!(validate("0 0 0 ? * 15W"), Err(ErrorKind::InvalidValue));
        assert_eq!(validate("0 0 0 6L * ?"), Err(ErrorKind::InvalidValue));
        assert_eq!(validate("0 0 0 6#3 * ?"), Err(ErrorKind::InvalidValue));
        assert_eq!(validate("0 0 L * * ?"), Err(ErrorKind::InvalidValue));
        assert_eq!(validate("0 0 0 lw * ?"), Err(ErrorKind::InvalidValue));
    }

    #[test]
    fn validate_reports_first_failing_field() {
        assert_eq!(validate("61 0 25 * * ?"), Err(ErrorKind::OutOfRange));
        assert_eq!(validate("? 0 25 * * ?"), Err(ErrorKind::InvalidQuestion));
        assert_eq!(validate("0 */0 ? * * ?"), Err(ErrorKind::InvalidStep));
    }

    #[test]
    fn validate_is_total_over_odd_input() {
        let inputs = [
            "\u{0}\u{1}\u{2}",
            "秒 分 时 日 月 周",
            "0 0 0 ? * ٣",
            "🕐 * * * * ?",
            "# # # # # #",
            "/ / / / / /",
            "- - - - - -",
            ", , , , , ,",
        ];
        for input in inputs {
            assert!(validate(input).is_err(), "accepted {input:?}");
        }
        let long = "1,".repeat(10_000) + "1 * * * * ?";
        assert_eq!(validate(&long), Ok(()));
    }

    #[test]
    fn validate_is_idempotent() {
        for input in ["0 0 12 * * ?", "0 0 25 * * ?", ""] {
            assert_eq!(validate(input), validate(input));
        }
    }

    #[test]
    fn lenient_mode_accepts_both_day_fields_constrained() {
        assert_eq!(validate("0 0 0 15 * MON"), Ok(()));
        assert_eq!(validate("0 0 0 * * *"), Ok(()));
    }

    #[test]
    fn strict_mode_rejects_both_day_fields_constrained() {
        let strict = Validator::strict();
        assert_eq!(
            strict.validate("0 0 0 15 * MON"),
            Err(ErrorKind::BothSpecified)
        );
        assert_eq!(strict.validate("0 0 0 L * 6#3"), Err(ErrorKind::BothSpecified));
        assert_eq!(strict.validate("0 0 0 15 * ?"), Ok(()));
        assert_eq!(strict.validate("0 0 0 * * *"), Ok(()));
        assert_eq!(strict.validate("0 0 0 ? * ?"), Err(ErrorKind::BothQuestion));
    }

    #[test]
    fn diagnose_reports_field_and_token() {
        let err = Validator::new()
            .diagnose("0 0 25 * * ?")
            .expect_err("hour 25 should fail");
        assert_eq!(err.kind, ErrorKind::OutOfRange);
        assert_eq!(err.field, Some(CronField::Hours));
        assert_eq!(err.token.as_deref(), Some("25"));
        assert_eq!(err.to_string(), "outOfRange in hours field '25'");
    }

    #[test]
    fn diagnose_leaves_expression_errors_unscoped() {
        let err = Validator::new()
            .diagnose("0 0 0 ? * ?")
            .expect_err("both ? should fail");
        assert_eq!(err.field, None);
        assert_eq!(err.to_string(), "bothQuestion");
    }

    #[test]
    fn error_keys_match_message_catalogue() {
        let keys: Vec<&str> = ErrorKind::ALL.iter().map(|k| k.key()).collect();
        assert_eq!(
            keys,
            [
                "required",
                "fieldCount",
                "invalidQuestion",
                "invalidStep",
                "invalidValue",
                "outOfRange",
                "bothQuestion",
                "bothSpecified",
            ]
        );
    }

    #[test]
    fn error_kind_serializes_as_key() {
        for kind in ErrorKind::ALL {
            let json = serde_json::to_string(&kind).expect("serialize");
            assert_eq!(json, format!("\"{}\"", kind.key()));
        }
    }
}
