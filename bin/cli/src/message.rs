//! User-facing text for message keys.
//!
//! The libraries report stable keys ([`ErrorKind::key`], preset keys and
//! categories); this module owns the English wording.

use orth_cron::{CronField, ErrorKind, FieldError};

/// Returns the description of a validation failure.
#[must_use]
pub fn error_text(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Required => "a cron expression is required",
        ErrorKind::FieldCount => "a cron expression has 6 or 7 space-separated fields",
        ErrorKind::InvalidQuestion => "'?' is only allowed in day-of-month or day-of-week",
        ErrorKind::InvalidStep => "the step after '/' must be a positive number",
        ErrorKind::InvalidValue => "the value is not valid for this field",
        ErrorKind::OutOfRange => "the value is outside the allowed range for this field",
        ErrorKind::BothQuestion => "day-of-month and day-of-week cannot both be '?'",
        ErrorKind::BothSpecified => {
            "one of day-of-month or day-of-week must be '?' or '*' when the other is set"
        }
    }
}

/// Describes a diagnosed failure, naming the field and token if known.
#[must_use]
pub fn describe(error: &FieldError) -> String {
    let text = error_text(error.kind);
    match (error.field, error.token.as_deref()) {
        (Some(field), Some(token)) => {
            format!("{text} ({field} field '{token}', allowed {})", bounds(field))
        }
        _ => text.to_string(),
    }
}

fn bounds(field: CronField) -> String {
    format!("{}-{}", field.min(), field.max())
}

/// Returns the label of a preset key.
#[must_use]
pub fn preset_label(key: &str) -> &str {
    match key {
        "every5s" => "Every 5 seconds",
        "every10s" => "Every 10 seconds",
        "every30s" => "Every 30 seconds",
        "every1m" => "Every minute",
        "every5m" => "Every 5 minutes",
        "every15m" => "Every 15 minutes",
        "every30m" => "Every 30 minutes",
        "every1h" => "Every hour",
        "every2h" => "Every 2 hours",
        "every6h" => "Every 6 hours",
        "midnight" => "Daily at midnight",
        "sixAM" => "Daily at 06:00",
        "noon" => "Daily at noon",
        "weekdays" => "Weekdays at midnight",
        "everyMonday" => "Every Monday at midnight",
        "firstDay" => "First day of the month",
        "lastDay" => "Last day of the month",
        other => other,
    }
}

/// Returns the heading of a preset category.
#[must_use]
pub fn category_label(category: &str) -> &str {
    match category {
        "frequent" => "Frequent",
        "minutes" => "Minutes",
        "hourly" => "Hourly",
        "daily" => "Daily",
        "weekly" => "Weekly",
        "monthly" => "Monthly",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orth_cron::{PRESETS, Validator};

    #[test]
    fn every_error_kind_has_distinct_text() {
        let texts: Vec<&str> = ErrorKind::ALL.iter().map(|k| error_text(*k)).collect();
        for (i, text) in texts.iter().enumerate() {
            assert!(!text.is_empty());
            assert!(!texts[i + 1..].contains(text), "duplicate text {text}");
        }
    }

    #[test]
    fn every_preset_has_a_label() {
        for preset in PRESETS {
            assert_ne!(preset_label(preset.key), preset.key, "{}", preset.key);
            assert_ne!(
                category_label(preset.category),
                preset.category,
                "{}",
                preset.category
            );
        }
    }

    #[test]
    fn describe_names_field_and_bounds() {
        let error = Validator::new()
            .diagnose("0 0 25 * * ?")
            .expect_err("hour 25 is out of range");
        let text = describe(&error);
        assert!(text.contains("hours"), "{text}");
        assert!(text.contains("'25'"), "{text}");
        assert!(text.contains("0-23"), "{text}");
    }

    #[test]
    fn describe_expression_level_error() {
        let error = Validator::new().diagnose("").expect_err("empty");
        assert_eq!(describe(&error), error_text(ErrorKind::Required));
    }
}
