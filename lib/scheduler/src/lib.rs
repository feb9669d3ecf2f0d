//! Schedules and trigger-time previews for orth jobs.
//!
//! This crate provides:
//!
//! - **Schedule types**: `NONE`, `CRON` and `FIX_RATE` job schedules
//! - **Preview**: The next-trigger-times contract and an in-process source

pub mod error;
pub mod preview;
pub mod schedule;

pub use error::ScheduleError;
pub use preview::{
    LocalTriggerTimes, MAX_PREVIEW_COUNT, PreviewSettings, TIME_FORMAT, TriggerTimeSource, Zone,
    preview,
};
pub use schedule::{Schedule, ScheduleType, Upcoming};
