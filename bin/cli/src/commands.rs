//! Command implementations.
//!
//! Each command writes its result to the given writer so it can be tested
//! without a terminal.

use crate::cli::Command;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::message;
use orth_cron::{CronField, ErrorKind, Validator, preset};
use orth_scheduler::{LocalTriggerTimes, PreviewSettings, ScheduleType, TriggerTimeSource};
use rootcause::prelude::Report;
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info};

/// Result of `validate --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub error: Option<ErrorKind>,
    pub field: Option<CronField>,
    pub token: Option<String>,
}

/// Runs a parsed command with the loaded configuration.
///
/// Returns `false` when the command ran but the input was rejected.
///
/// # Errors
///
/// Returns an error if the preview fails or output cannot be written.
pub async fn run<W: Write + Send>(
    command: Command,
    config: &CliConfig,
    out: &mut W,
) -> Result<bool, Report<CliError>> {
    match command {
        Command::Validate {
            expression,
            strict,
            json,
        } => {
            let validator = validator(config, strict);
            validate(out, &validator, &expression, json)
        }
        Command::Preview {
            schedule_type,
            conf,
            count,
            zone,
            strict,
        } => {
            let settings = PreviewSettings {
                count: count.unwrap_or(config.preview.count),
                zone: zone.unwrap_or(config.preview.zone),
            };
            let source = LocalTriggerTimes::new(settings);
            let validator = validator(config, strict);
            preview(out, &source, &validator, schedule_type, &conf).await?;
            Ok(true)
        }
        Command::Presets { zone } => {
            let source = LocalTriggerTimes::new(PreviewSettings {
                count: 1,
                zone: zone.unwrap_or(config.preview.zone),
            });
            presets(out, &source)?;
            Ok(true)
        }
    }
}

fn validator(config: &CliConfig, strict: bool) -> Validator {
    if strict {
        Validator::strict()
    } else {
        config.validation.validator()
    }
}

/// Validates `expression` and prints the outcome.
///
/// Returns whether the expression is valid.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn validate<W: Write>(
    out: &mut W,
    validator: &Validator,
    expression: &str,
    json: bool,
) -> Result<bool, Report<CliError>> {
    let outcome = validator.diagnose(expression);
    debug!(valid = outcome.is_ok(), "validated expression");

    if json {
        let report = match &outcome {
            Ok(()) => ValidationReport {
                valid: true,
                error: None,
                field: None,
                token: None,
            },
            Err(e) => ValidationReport {
                valid: false,
                error: Some(e.kind),
                field: e.field,
                token: e.token.clone(),
            },
        };
        serde_json::to_writer(&mut *out, &report).map_err(|e| CliError::Output {
            details: e.to_string(),
        })?;
        writeln!(out).map_err(CliError::from)?;
    } else {
        let written = match &outcome {
            Ok(()) => writeln!(out, "valid"),
            Err(e) => writeln!(out, "{}: {}", e.kind, message::describe(e)),
        };
        written.map_err(CliError::from)?;
    }

    Ok(outcome.is_ok())
}

/// Prints the next trigger times of a schedule, one per line.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the source fails, or
/// output cannot be written.
pub async fn preview<W, S>(
    out: &mut W,
    source: &S,
    validator: &Validator,
    schedule_type: ScheduleType,
    conf: &str,
) -> Result<(), Report<CliError>>
where
    W: Write + Send,
    S: TriggerTimeSource + ?Sized,
{
    let times = orth_scheduler::preview(source, validator, schedule_type, conf)
        .await
        .map_err(|e| CliError::Preview {
            details: e.to_string(),
        })?;

    if times.is_empty() {
        info!(%schedule_type, "schedule has no upcoming trigger times");
        writeln!(out, "no upcoming trigger times").map_err(CliError::from)?;
    }
    for time in &times {
        writeln!(out, "{time}").map_err(CliError::from)?;
    }
    Ok(())
}

/// Prints the presets by category, each with its next trigger time.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub fn presets<W: Write>(
    out: &mut W,
    source: &LocalTriggerTimes,
) -> Result<(), Report<CliError>> {
    for (category, members) in preset::grouped() {
        writeln!(out, "{}", message::category_label(category)).map_err(CliError::from)?;
        for preset in members {
            let next = source
                .compute(ScheduleType::Cron, preset.expression)
                .map_err(|e| CliError::Preview {
                    details: e.to_string(),
                })?;
            writeln!(
                out,
                "  {:<26} {:<18} next {}",
                message::preset_label(preset.key),
                preset.expression,
                next.first().map_or("-", String::as_str),
            )
            .map_err(CliError::from)?;
        }
    }
    Ok(())
}
