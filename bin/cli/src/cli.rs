//! CLI definitions for orth-cron.

use clap::{Parser, Subcommand};
use orth_scheduler::{ScheduleType, Zone};
use std::path::PathBuf;

/// orth-cron CLI.
#[derive(Debug, Parser)]
#[command(name = "orth-cron")]
#[command(about = "Validate Quartz cron expressions and preview job trigger times")]
#[command(version)]
pub struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, global = true, env = "ORTH_CRON_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a cron expression
    Validate {
        /// Quartz cron expression, quoted
        expression: String,

        /// Also reject expressions that constrain both day fields
        #[arg(long)]
        strict: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the next trigger times of a schedule
    Preview {
        /// Schedule type (NONE, CRON, FIX_RATE)
        #[arg(long = "type", default_value_t = ScheduleType::Cron)]
        schedule_type: ScheduleType,

        /// Cron expression or interval in seconds
        #[arg(long)]
        conf: String,

        /// Number of trigger times (1-5)
        #[arg(long)]
        count: Option<usize>,

        /// Time zone: utc, local, an offset such as +08:00 or an IANA name
        #[arg(long)]
        zone: Option<Zone>,

        /// Also reject expressions that constrain both day fields
        #[arg(long)]
        strict: bool,
    },

    /// List the preset schedules with their next trigger time
    Presets {
        /// Time zone: utc, local, an offset such as +08:00 or an IANA name
        #[arg(long)]
        zone: Option<Zone>,
    },
}
