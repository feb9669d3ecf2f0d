//! Positional fields of a Quartz cron expression.

use serde::{Deserialize, Serialize};
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

const DAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// A field position in a 6- or 7-field Quartz expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CronField {
    Seconds,
    Minutes,
    Hours,
    DayOfMonth,
    Month,
    /// Quartz numbering: 1 = Sunday through 7 = Saturday.
    DayOfWeek,
    /// Optional seventh field.
    Year,
}

impl CronField {
    /// All fields in positional order.
    pub const ALL: [CronField; 7] = [
        Self::Seconds,
        Self::Minutes,
        Self::Hours,
        Self::DayOfMonth,
        Self::Month,
        Self::DayOfWeek,
        Self::Year,
    ];

    /// Returns the 0-based position of this field.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Seconds => 0,
            Self::Minutes => 1,
            Self::Hours => 2,
            Self::DayOfMonth => 3,
            Self::Month => 4,
            Self::DayOfWeek => 5,
            Self::Year => 6,
        }
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn min(self) -> u32 {
        match self {
            Self::Seconds | Self::Minutes | Self::Hours => 0,
            Self::DayOfMonth | Self::Month | Self::DayOfWeek => 1,
            Self::Year => 1970,
        }
    }

    /// Inclusive upper bound.
    #[must_use]
    pub const fn max(self) -> u32 {
        match self {
            Self::Seconds | Self::Minutes => 59,
            Self::Hours => 23,
            Self::DayOfMonth => 31,
            Self::Month => 12,
            Self::DayOfWeek => 7,
            Self::Year => 2099,
        }
    }

    /// Returns true if `value` lies within `[min, max]`.
    #[must_use]
    pub const fn contains(self, value: u32) -> bool {
        value >= self.min() && value <= self.max()
    }

    /// Returns true for the two fields that accept `?`.
    #[must_use]
    pub const fn is_day_field(self) -> bool {
        matches!(self, Self::DayOfMonth | Self::DayOfWeek)
    }

    /// Human-readable name, as used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::DayOfMonth => "day-of-month",
            Self::Month => "month",
            Self::DayOfWeek => "day-of-week",
            Self::Year => "year",
        }
    }

    /// Resolves a month or weekday name to its number.
    ///
    /// Matching is case-insensitive. Names only resolve in the field they
    /// belong to; `MON` in the month field is not an alias.
    #[must_use]
    pub fn alias(self, token: &str) -> Option<u32> {
        let names: &[&str] = match self {
            Self::Month => &MONTH_NAMES,
            Self::DayOfWeek => &DAY_NAMES,
            _ => return None,
        };
        names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(token))
            .and_then(|pos| u32::try_from(pos + 1).ok())
    }

    /// Resolves a token to a number: alias first, then ASCII digits.
    ///
    /// Returns `None` if the token is neither. A digit string too large for
    /// `u32` resolves to `u32::MAX`, which is out of range for every field.
    #[must_use]
    pub fn resolve(self, token: &str) -> Option<u32> {
        self.alias(token).or_else(|| parse_number(token))
    }
}

impl fmt::Display for CronField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a non-empty run of ASCII digits.
pub(crate) fn parse_number(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(token.parse().unwrap_or(u32::MAX))
}
