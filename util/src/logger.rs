//! Logger setup for the manipulator execs
//!
//! Lines are written to stdout and the session log file as
//! `[<seconds since epoch> <LVL>] <message>`. Debug and trace lines also carry
//! the module path that emitted them.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{self, info, Level};
use std::fmt;
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Dependencies whose debug output drowns out the exec's own.
const QUIET_TARGETS: [&str; 1] = ["urdf_rs"];

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("The log level must be Info, Debug or Trace, found `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Cannot open the session log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("A logger has already been installed: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Install the logger for this process.
///
/// Must be called once, after the session has been created.
pub fn logger_init(
    min_level: LevelFilter,
    session: &session::Session,
) -> Result<(), LoggerInitError> {
    check_level(min_level)?;

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}",
                Line {
                    elapsed_s: session::get_elapsed_seconds(),
                    level: record.level(),
                    target: record.target(),
                    message,
                }
            ))
        })
        .level(min_level);

    for target in QUIET_TARGETS.iter() {
        dispatch = dispatch.level_for(*target, LevelFilter::Info);
    }

    dispatch
        .chain(std::io::stdout())
        .chain(log_file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging to {:?} at {:?}", session.log_file_path, min_level);
    info!("Session epoch: {}", session::get_epoch());

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE ITEMS
// ---------------------------------------------------------------------------

/// Refuse levels quieter than `Info`.
fn check_level(min_level: LevelFilter) -> Result<(), LoggerInitError> {
    if min_level < Level::Info {
        Err(LoggerInitError::InvalidMinLogLevel(min_level))
    } else {
        Ok(())
    }
}

/// One formatted log line.
struct Line<'a, M> {
    elapsed_s: f64,
    level: Level,
    target: &'a str,
    message: M,
}

impl<'a, M: fmt::Display> fmt::Display for Line<'a, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:10.6} {}] ", self.elapsed_s, level_tag(self.level))?;

        if self.level > Level::Info {
            write!(f, "{}: ", self.target)?;
        }

        write!(f, "{}", self.message)
    }
}

fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Error => "ERR".red().bold(),
        Level::Warn => "WRN".yellow(),
        Level::Info => "INF".normal(),
        Level::Debug => "DBG".dimmed(),
        Level::Trace => "TRC".dimmed().italic(),
    }
}
