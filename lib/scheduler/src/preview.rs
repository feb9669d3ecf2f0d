//! Next-trigger-time previews.
//!
//! A [`TriggerTimeSource`] answers "when will this schedule fire next?" for a
//! schedule that has not been saved yet. The scheduler backend is the real
//! source; [`LocalTriggerTimes`] computes the same answer in-process.

use crate::error::ScheduleError;
use crate::schedule::{Schedule, ScheduleType};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use orth_cron::Validator;
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

/// Upper bound on the number of trigger times in one preview.
pub const MAX_PREVIEW_COUNT: usize = 5;

/// Timestamp format of preview entries, in the preview zone without offset.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of upcoming trigger times for an unsaved schedule.
///
/// Implementations return at most [`MAX_PREVIEW_COUNT`] entries, all after
/// the current time, formatted with [`TIME_FORMAT`]. Entries are strictly
/// ascending as instants. The text carries no offset, so across a
/// daylight-saving fall-back it may repeat or step back by the shift.
/// A blank configuration or a `NONE` schedule yields an empty sequence.
#[async_trait]
pub trait TriggerTimeSource: Send + Sync {
    /// Returns the next trigger times for a schedule configuration.
    async fn next_trigger_times(
        &self,
        schedule_type: ScheduleType,
        schedule_conf: &str,
    ) -> Result<Vec<String>, Report<ScheduleError>>;
}

/// Time zone used to evaluate and display trigger times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Zone {
    Utc,
    /// The host's local zone.
    #[default]
    Local,
    Fixed(FixedOffset),
    /// An IANA zone such as `America/New_York`.
    Named(Tz),
}

impl Zone {
    fn format_upcoming(
        self,
        schedule: &Schedule,
        now: DateTime<Utc>,
        count: usize,
    ) -> Result<Vec<String>, ScheduleError> {
        match self {
            Self::Utc => format_upcoming(schedule, now, count),
            Self::Local => format_upcoming(schedule, now.with_timezone(&Local), count),
            Self::Fixed(offset) => format_upcoming(schedule, now.with_timezone(&offset), count),
            Self::Named(tz) => format_upcoming(schedule, now.with_timezone(&tz), count),
        }
    }
}

/// Collects up to `count` trigger times, checking order on the instants
/// before they lose their offset in formatting.
fn format_upcoming<Z>(
    schedule: &Schedule,
    after: DateTime<Z>,
    count: usize,
) -> Result<Vec<String>, ScheduleError>
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    let times: Vec<DateTime<Z>> = schedule.upcoming(after.clone()).take(count).collect();
    let mut previous = &after;
    for at in &times {
        if at <= previous {
            return Err(ScheduleError::ContractViolation {
                reason: format!("{at} is not after {previous}"),
            });
        }
        previous = at;
    }
    Ok(times
        .iter()
        .map(|at| at.format(TIME_FORMAT).to_string())
        .collect())
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => f.write_str("utc"),
            Self::Local => f.write_str("local"),
            Self::Fixed(offset) => write!(f, "{offset}"),
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl FromStr for Zone {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            z if z.eq_ignore_ascii_case("utc") || z == "Z" => Ok(Self::Utc),
            z if z.eq_ignore_ascii_case("local") => Ok(Self::Local),
            z => z
                .parse::<FixedOffset>()
                .map(Self::Fixed)
                .ok()
                .or_else(|| z.parse::<Tz>().ok().map(Self::Named))
                .ok_or_else(|| ScheduleError::InvalidTimezone {
                    timezone: s.to_string(),
                }),
        }
    }
}

impl TryFrom<String> for Zone {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Zone> for String {
    fn from(zone: Zone) -> Self {
        zone.to_string()
    }
}

/// Settings for [`LocalTriggerTimes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewSettings {
    /// Number of entries, clamped to `1..=MAX_PREVIEW_COUNT`.
    #[serde(default = "default_count")]
    pub count: usize,

    #[serde(default)]
    pub zone: Zone,
}

fn default_count() -> usize {
    MAX_PREVIEW_COUNT
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            count: default_count(),
            zone: Zone::default(),
        }
    }
}

impl PreviewSettings {
    /// Returns the entry count after clamping.
    #[must_use]
    pub fn effective_count(&self) -> usize {
        self.count.clamp(1, MAX_PREVIEW_COUNT)
    }
}

/// Computes trigger times in-process with the same rules as the backend.
#[derive(Debug, Clone, Default)]
pub struct LocalTriggerTimes {
    settings: PreviewSettings,
    now: Option<DateTime<Utc>>,
}

impl LocalTriggerTimes {
    /// Creates a source with the given settings.
    #[must_use]
    pub fn new(settings: PreviewSettings) -> Self {
        Self {
            settings,
            now: None,
        }
    }

    /// Pins "now" to a fixed instant instead of the wall clock.
    #[must_use]
    pub fn pinned_at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Returns the settings.
    #[must_use]
    pub fn settings(&self) -> &PreviewSettings {
        &self.settings
    }

    /// Computes the preview synchronously.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid for the type.
    pub fn compute(
        &self,
        schedule_type: ScheduleType,
        schedule_conf: &str,
    ) -> Result<Vec<String>, ScheduleError> {
        if schedule_conf.trim().is_empty() {
            return Ok(Vec::new());
        }
        let schedule = Schedule::parse(schedule_type, schedule_conf)?;
        let now = self.now.unwrap_or_else(Utc::now);
        let count = self.settings.effective_count();
        let times = self.settings.zone.format_upcoming(&schedule, now, count)?;
        debug!(count = times.len(), zone = %self.settings.zone, "computed trigger times");
        Ok(times)
    }
}

#[async_trait]
impl TriggerTimeSource for LocalTriggerTimes {
    #[instrument(skip(self))]
    async fn next_trigger_times(
        &self,
        schedule_type: ScheduleType,
        schedule_conf: &str,
    ) -> Result<Vec<String>, Report<ScheduleError>> {
        Ok(self.compute(schedule_type, schedule_conf)?)
    }
}

/// Previews a schedule through `source`, validating on both sides.
///
/// Cron expressions are checked with `validator` first so an invalid
/// expression never reaches the source. The returned sequence is checked
/// for length and format; ordering is the source's job, since the text
/// alone cannot order times across a daylight-saving fall-back.
///
/// # Errors
///
/// Returns an error if validation fails, the source fails, or the source
/// breaks its contract.
pub async fn preview<S>(
    source: &S,
    validator: &Validator,
    schedule_type: ScheduleType,
    schedule_conf: &str,
) -> Result<Vec<String>, Report<ScheduleError>>
where
    S: TriggerTimeSource + ?Sized,
{
    if schedule_conf.trim().is_empty() {
        return Ok(Vec::new());
    }

    if schedule_type == ScheduleType::Cron {
        validator
            .diagnose(schedule_conf)
            .map_err(|e| ScheduleError::InvalidCronExpression {
                expression: schedule_conf.trim().to_string(),
                reason: e.to_string(),
            })?;
    }

    let times = source
        .next_trigger_times(schedule_type, schedule_conf)
        .await?;
    check_contract(&times)?;
    debug!(%schedule_type, count = times.len(), "preview ready");
    Ok(times)
}

fn check_contract(times: &[String]) -> Result<(), ScheduleError> {
    if times.len() > MAX_PREVIEW_COUNT {
        return Err(ScheduleError::ContractViolation {
            reason: format!("{} entries, at most {MAX_PREVIEW_COUNT} allowed", times.len()),
        });
    }
    if let Some(bad) = times
        .iter()
        .find(|at| NaiveDateTime::parse_from_str(at, TIME_FORMAT).is_err())
    {
        return Err(ScheduleError::ContractViolation {
            reason: format!("'{bad}' is not formatted as {TIME_FORMAT}"),
        });
    }
    Ok(())
}
