//! Compiled cron expressions and fire-time evaluation.
//!
//! An expression is compiled only after it passes the lenient validator, so
//! the evaluator never accepts anything the validator rejects. Compilation
//! adds the Quartz limits validation leaves open (see [`CronError::Unsupported`]).

use crate::error::CronError;
use crate::field::{CronField, parse_number};
use crate::validate::Validator;
use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike,
    Weekday,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A bit set over the values 0..=63.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ValueSet(u64);

impl ValueSet {
    fn insert(&mut self, value: u32) {
        if value < 64 {
            self.0 |= 1u64 << value;
        }
    }

    fn contains(self, value: u32) -> bool {
        value < 64 && self.0 & (1u64 << value) != 0
    }

    /// Smallest member `>= value`.
    fn next_from(self, value: u32) -> Option<u32> {
        if value >= 64 {
            return None;
        }
        let masked = self.0 & (u64::MAX << value);
        (masked != 0).then(|| masked.trailing_zeros())
    }
}

impl FromIterator<u32> for ValueSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut set = Self::default();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

/// Day-of-month constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonthDays {
    Any,
    Days(ValueSet),
    /// `L`
    Last,
    /// `LW`
    LastWeekday,
    /// `nW`
    NearestWeekday(u32),
}

/// Day-of-week constraint, in Quartz numbering (1 = Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeekDays {
    Any,
    Days(ValueSet),
    /// `nL`
    Last(u32),
    /// `d#n`
    Nth { weekday: u32, nth: u32 },
}

/// A compiled Quartz cron expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CronExpression {
    source: String,
    seconds: ValueSet,
    minutes: ValueSet,
    hours: ValueSet,
    month_days: MonthDays,
    months: ValueSet,
    week_days: WeekDays,
    years: BTreeSet<u32>,
}

impl CronExpression {
    /// Parses and compiles an expression.
    ///
    /// # Errors
    ///
    /// Returns [`CronError::Invalid`] if validation fails and
    /// [`CronError::Unsupported`] for valid expressions Quartz cannot evaluate.
    pub fn parse(expression: &str) -> Result<Self, CronError> {
        Validator::new().diagnose(expression)?;

        let tokens: Vec<&str> = expression.split_whitespace().collect();
        let token = |field: CronField| tokens.get(field.index()).copied();
        let required = |field: CronField| token(field).unwrap_or("*");

        let day_of_month = required(CronField::DayOfMonth);
        let day_of_week = required(CronField::DayOfWeek);
        if day_of_month != "?" && day_of_week != "?" {
            return Err(CronError::Unsupported {
                field: CronField::DayOfWeek,
                token: day_of_week.to_string(),
                reason: "one of day-of-month and day-of-week must be '?'",
            });
        }

        Ok(Self {
            source: tokens.join(" "),
            seconds: expand(CronField::Seconds, required(CronField::Seconds))
                .into_iter()
                .collect(),
            minutes: expand(CronField::Minutes, required(CronField::Minutes))
                .into_iter()
                .collect(),
            hours: expand(CronField::Hours, required(CronField::Hours))
                .into_iter()
                .collect(),
            month_days: compile_month_days(day_of_month)?,
            months: expand(CronField::Month, required(CronField::Month))
                .into_iter()
                .collect(),
            week_days: compile_week_days(day_of_week)?,
            years: expand(CronField::Year, token(CronField::Year).unwrap_or("*"))
                .into_iter()
                .collect(),
        })
    }

    /// Returns the normalized expression text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if `at` (truncated to the second) is a fire time.
    #[must_use]
    pub fn matches<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
        let local = at.naive_local();
        u32::try_from(local.year()).is_ok_and(|year| self.years.contains(&year))
            && self.months.contains(local.month())
            && self.day_matches(local.date())
            && self.hours.contains(local.hour())
            && self.minutes.contains(local.minute())
            && self.seconds.contains(local.second())
    }

    /// Returns the first fire time strictly after `after`.
    ///
    /// Evaluation happens in `after`'s time zone. Local times skipped by a
    /// daylight-saving transition never fire; repeated local times fire once,
    /// at the earliest instant later than `after`.
    #[must_use]
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let tz = after.timezone();
        let mut cursor = after.naive_local();
        loop {
            let candidate = self.next_local_after(cursor)?;
            match tz.from_local_datetime(&candidate) {
                LocalResult::Single(at) if at > *after => return Some(at),
                LocalResult::Ambiguous(earliest, latest) => {
                    if earliest > *after {
                        return Some(earliest);
                    }
                    if latest > *after {
                        return Some(latest);
                    }
                }
                _ => {}
            }
            cursor = candidate;
        }
    }

    /// Returns a lazy, ascending sequence of fire times after `after`.
    #[must_use]
    pub fn iter_after<Tz: TimeZone>(&self, after: DateTime<Tz>) -> FireTimes<'_, Tz> {
        FireTimes {
            expression: self,
            cursor: Some(after),
        }
    }

    fn next_local_after(&self, after: NaiveDateTime) -> Option<NaiveDateTime> {
        let mut t = after
            .with_nanosecond(0)?
            .checked_add_signed(Duration::seconds(1))?;

        loop {
            let year = u32::try_from(t.year()).ok()?;
            match self.years.range(year..).next().copied() {
                None => return None,
                Some(next) if next != year => {
                    t = start_of_month(next, 1)?;
                    continue;
                }
                Some(_) => {}
            }

            match self.months.next_from(t.month()) {
                None => {
                    t = start_of_month(year + 1, 1)?;
                    continue;
                }
                Some(month) if month != t.month() => {
                    t = start_of_month(year, month)?;
                    continue;
                }
                Some(_) => {}
            }

            let date = t.date();
            if !self.day_matches(date) {
                t = date.succ_opt()?.and_hms_opt(0, 0, 0)?;
                continue;
            }

            match self.hours.next_from(t.hour()) {
                None => {
                    t = date.succ_opt()?.and_hms_opt(0, 0, 0)?;
                    continue;
                }
                Some(hour) if hour != t.hour() => {
                    t = date.and_hms_opt(hour, 0, 0)?;
                    continue;
                }
                Some(_) => {}
            }

            match self.minutes.next_from(t.minute()) {
                None => {
                    t = date
                        .and_hms_opt(t.hour(), 0, 0)?
                        .checked_add_signed(Duration::hours(1))?;
                    continue;
                }
                Some(minute) if minute != t.minute() => {
                    t = date.and_hms_opt(t.hour(), minute, 0)?;
                    continue;
                }
                Some(_) => {}
            }

            match self.seconds.next_from(t.second()) {
                None => {
                    t = date
                        .and_hms_opt(t.hour(), t.minute(), 0)?
                        .checked_add_signed(Duration::minutes(1))?;
                    continue;
                }
                Some(second) if second != t.second() => {
                    t = date.and_hms_opt(t.hour(), t.minute(), second)?;
                    continue;
                }
                Some(_) => return Some(t),
            }
        }
    }

    fn day_matches(&self, date: NaiveDate) -> bool {
        let day = date.day();
        let last = last_day_of_month(date.year(), date.month());

        let month_day_ok = match self.month_days {
            MonthDays::Any => true,
            MonthDays::Days(days) => days.contains(day),
            MonthDays::Last => day == last,
            MonthDays::LastWeekday => {
                let last_date = date.with_day(last);
                match last_date.map(|d| d.weekday()) {
                    Some(Weekday::Sat) => day + 1 == last,
                    Some(Weekday::Sun) => day + 2 == last,
                    _ => day == last,
                }
            }
            MonthDays::NearestWeekday(target) => {
                nearest_weekday(date, target, last).is_some_and(|nearest| nearest == day)
            }
        };

        let weekday = date.weekday().number_from_sunday();
        let week_day_ok = match self.week_days {
            WeekDays::Any => true,
            WeekDays::Days(days) => days.contains(weekday),
            WeekDays::Last(target) => weekday == target && day + 7 > last,
            WeekDays::Nth { weekday: target, nth } => weekday == target && (day - 1) / 7 + 1 == nth,
        };

        month_day_ok && week_day_ok
    }
}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for CronExpression {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CronExpression {
    type Error = CronError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CronExpression> for String {
    fn from(expression: CronExpression) -> Self {
        expression.source
    }
}

/// Lazy iterator over upcoming fire times.
#[derive(Debug, Clone)]
pub struct FireTimes<'a, Tz: TimeZone> {
    expression: &'a CronExpression,
    cursor: Option<DateTime<Tz>>,
}

impl<Tz: TimeZone> Iterator for FireTimes<'_, Tz> {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        let after = self.cursor.take()?;
        let next = self.expression.next_after(&after)?;
        self.cursor = Some(next.clone());
        Some(next)
    }
}

/// Expands a validated list/range/step token into its values.
fn expand(field: CronField, token: &str) -> Vec<u32> {
    if token == "*" || token == "?" {
        return (field.min()..=field.max()).collect();
    }
    token
        .split(',')
        .flat_map(|part| expand_part(field, part))
        .collect()
}

fn expand_part(field: CronField, part: &str) -> Vec<u32> {
    if let Some((base, step)) = part.split_once('/') {
        let start = if base == "*" || base.is_empty() {
            Some(field.min())
        } else {
            field.resolve(base)
        };
        let step = parse_number(step)
            .and_then(|s| usize::try_from(s).ok())
            .unwrap_or(usize::MAX)
            .max(1);
        return start
            .map(|start| (start..=field.max()).step_by(step).collect())
            .unwrap_or_default();
    }

    if let Some((lo, hi)) = part.split_once('-') {
        return match (field.resolve(lo), field.resolve(hi)) {
            (Some(lo), Some(hi)) => (lo..=hi).collect(),
            _ => Vec::new(),
        };
    }

    field.resolve(part).into_iter().collect()
}

fn compile_month_days(token: &str) -> Result<MonthDays, CronError> {
    match token {
        "?" | "*" => return Ok(MonthDays::Any),
        "L" => return Ok(MonthDays::Last),
        "LW" => return Ok(MonthDays::LastWeekday),
        _ => {}
    }
    if let Some(day) = token.strip_suffix('W').and_then(parse_number) {
        if !CronField::DayOfMonth.contains(day) {
            return Err(CronError::Unsupported {
                field: CronField::DayOfMonth,
                token: token.to_string(),
                reason: "nearest-weekday day must be between 1 and 31",
            });
        }
        return Ok(MonthDays::NearestWeekday(day));
    }
    Ok(MonthDays::Days(
        expand(CronField::DayOfMonth, token).into_iter().collect(),
    ))
}

fn compile_week_days(token: &str) -> Result<WeekDays, CronError> {
    let unsupported = |reason| CronError::Unsupported {
        field: CronField::DayOfWeek,
        token: token.to_string(),
        reason,
    };

    match token {
        "?" | "*" => return Ok(WeekDays::Any),
        // Bare `L` is the last day of the week: Saturday.
        "L" => return Ok(WeekDays::Days([7].into_iter().collect())),
        _ => {}
    }
    if let Some(weekday) = token.strip_suffix('L').and_then(parse_number) {
        if !CronField::DayOfWeek.contains(weekday) {
            return Err(unsupported("day-of-week must be between 1 and 7"));
        }
        return Ok(WeekDays::Last(weekday));
    }
    if let Some((weekday, nth)) = token.split_once('#') {
        let (Some(weekday), Some(nth)) = (parse_number(weekday), parse_number(nth)) else {
            return Err(unsupported("expected <day-of-week>#<n>"));
        };
        if !CronField::DayOfWeek.contains(weekday) {
            return Err(unsupported("day-of-week must be between 1 and 7"));
        }
        if !(1..=5).contains(&nth) {
            return Err(unsupported("a month has at most 5 of any weekday"));
        }
        return Ok(WeekDays::Nth { weekday, nth });
    }
    Ok(WeekDays::Days(
        expand(CronField::DayOfWeek, token).into_iter().collect(),
    ))
}

fn start_of_month(year: u32, month: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, 1)?.and_hms_opt(0, 0, 0)
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        2 => 28,
        _ => 31,
    }
}

/// The weekday closest to day `target` of `date`'s month, without leaving it.
fn nearest_weekday(date: NaiveDate, target: u32, last: u32) -> Option<u32> {
    if target > last {
        return None;
    }
    let anchor = date.with_day(target)?;
    let nearest = match anchor.weekday() {
        Weekday::Sat if target == 1 => target + 2,
        Weekday::Sat => target - 1,
        Weekday::Sun if target == last => target - 2,
        Weekday::Sun => target + 1,
        _ => target,
    };
    Some(nearest)
}
