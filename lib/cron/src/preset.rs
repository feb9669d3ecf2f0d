//! Named schedules offered when configuring a job.

use serde::Serialize;

/// A named cron expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CronPreset {
    /// Message key for the preset label.
    pub key: &'static str,
    pub expression: &'static str,
    /// Message key for the group heading.
    pub category: &'static str,
}

const fn preset(key: &'static str, expression: &'static str, category: &'static str) -> CronPreset {
    CronPreset {
        key,
        expression,
        category,
    }
}

/// The preset catalogue, in display order.
pub const PRESETS: &[CronPreset] = &[
    preset("every5s", "*/5 * * * * ?", "frequent"),
    preset("every10s", "*/10 * * * * ?", "frequent"),
    preset("every30s", "*/30 * * * * ?", "frequent"),
    preset("every1m", "0 * * * * ?", "minutes"),
    preset("every5m", "0 */5 * * * ?", "minutes"),
    preset("every15m", "0 */15 * * * ?", "minutes"),
    preset("every30m", "0 */30 * * * ?", "minutes"),
    preset("every1h", "0 0 * * * ?", "hourly"),
    preset("every2h", "0 0 */2 * * ?", "hourly"),
    preset("every6h", "0 0 */6 * * ?", "hourly"),
    preset("midnight", "0 0 0 * * ?", "daily"),
    preset("sixAM", "0 0 6 * * ?", "daily"),
    preset("noon", "0 0 12 * * ?", "daily"),
    preset("weekdays", "0 0 0 ? * MON-FRI", "weekly"),
    preset("everyMonday", "0 0 0 ? * MON", "weekly"),
    preset("firstDay", "0 0 0 1 * ?", "monthly"),
    preset("lastDay", "0 0 0 L * ?", "monthly"),
];

/// Groups presets by category, keeping first-appearance order.
#[must_use]
pub fn grouped() -> Vec<(&'static str, Vec<&'static CronPreset>)> {
    let mut groups: Vec<(&'static str, Vec<&'static CronPreset>)> = Vec::new();
    for preset in PRESETS {
        match groups.iter_mut().find(|(category, _)| *category == preset.category) {
            Some((_, members)) => members.push(preset),
            None => groups.push((preset.category, vec![preset])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::CronExpression;
    use crate::validate::Validator;

    #[test]
    fn every_preset_validates_strictly_and_compiles() {
        let strict = Validator::strict();
        for preset in PRESETS {
            assert_eq!(strict.validate(preset.expression), Ok(()), "{}", preset.key);
            assert!(CronExpression::parse(preset.expression).is_ok(), "{}", preset.key);
        }
    }

    #[test]
    fn keys_are_unique() {
        for (i, preset) in PRESETS.iter().enumerate() {
            assert!(
                PRESETS[i + 1..].iter().all(|other| other.key != preset.key),
                "duplicate key {}",
                preset.key
            );
        }
    }

    #[test]
    fn grouped_keeps_category_order() {
        let categories: Vec<&str> = grouped().iter().map(|(c, _)| *c).collect();
        assert_eq!(
            categories,
            ["frequent", "minutes", "hourly", "daily", "weekly", "monthly"]
        );
        let total: usize = grouped().iter().map(|(_, members)| members.len()).sum();
        assert_eq!(total, PRESETS.len());
    }
}
