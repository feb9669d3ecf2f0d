//! Command-line front end for orth cron validation and trigger-time
//! previews.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod message;
