//! Job schedule types and next-trigger-time calculation.

use crate::error::ScheduleError;
use chrono::{DateTime, Duration, TimeZone};
use orth_cron::CronExpression;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a job is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleType {
    /// Manual triggers only.
    #[default]
    None,
    /// Quartz cron expression.
    Cron,
    /// Fixed interval in seconds.
    FixRate,
}

impl ScheduleType {
    /// All schedule types.
    pub const ALL: [ScheduleType; 3] = [Self::None, Self::Cron, Self::FixRate];

    /// Returns the wire name (`NONE`, `CRON`, `FIX_RATE`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Cron => "CRON",
            Self::FixRate => "FIX_RATE",
        }
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleType {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| ScheduleError::UnknownScheduleType {
                name: s.to_string(),
            })
    }
}

/// A compiled schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    None,
    Cron(CronExpression),
    FixRate(Duration),
}

impl Schedule {
    /// Compiles a schedule configuration for the given type.
    ///
    /// `NONE` ignores `conf`. `CRON` expects a Quartz expression. `FIX_RATE`
    /// expects a positive whole number of seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid for the type.
    pub fn parse(schedule_type: ScheduleType, conf: &str) -> Result<Self, ScheduleError> {
        match schedule_type {
            ScheduleType::None => Ok(Self::None),
            ScheduleType::Cron => CronExpression::parse(conf)
                .map(Self::Cron)
                .map_err(|e| ScheduleError::InvalidCronExpression {
                    expression: conf.trim().to_string(),
                    reason: e.to_string(),
                }),
            ScheduleType::FixRate => {
                let invalid = || ScheduleError::InvalidFixRate {
                    conf: conf.to_string(),
                };
                let seconds: i64 = conf.trim().parse().map_err(|_| invalid())?;
                if seconds <= 0 {
                    return Err(invalid());
                }
                Duration::try_seconds(seconds)
                    .map(Self::FixRate)
                    .ok_or_else(invalid)
            }
        }
    }

    /// Returns the type of this schedule.
    #[must_use]
    pub fn schedule_type(&self) -> ScheduleType {
        match self {
            Self::None => ScheduleType::None,
            Self::Cron(_) => ScheduleType::Cron,
            Self::FixRate(_) => ScheduleType::FixRate,
        }
    }

    /// Calculates the next trigger time after the given time.
    ///
    /// Returns `None` for manual-only schedules and for cron expressions
    /// with no remaining fire time.
    #[must_use]
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        match self {
            Self::None => None,
            Self::Cron(expression) => expression.next_after(after),
            Self::FixRate(interval) => after.clone().checked_add_signed(*interval),
        }
    }

    /// Returns a lazy, ascending sequence of trigger times after `after`.
    #[must_use]
    pub fn upcoming<Tz: TimeZone>(&self, after: DateTime<Tz>) -> Upcoming<'_, Tz> {
        Upcoming {
            schedule: self,
            cursor: Some(after),
        }
    }
}

/// Lazy iterator over upcoming trigger times of a [`Schedule`].
#[derive(Debug, Clone)]
pub struct Upcoming<'a, Tz: TimeZone> {
    schedule: &'a Schedule,
    cursor: Option<DateTime<Tz>>,
}

impl<Tz: TimeZone> Iterator for Upcoming<'_, Tz> {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        let after = self.cursor.take()?;
        let next = self.schedule.next_after(&after)?;
        self.cursor = Some(next.clone());
        Some(next)
    }
}
