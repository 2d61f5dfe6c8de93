//! Logging setup for the drive executable
//!
//! Every line is written to stdout and to the session's log file, prefixed with the seconds
//! elapsed since the session started and a three letter level tag. At debug and trace the target
//! module is included too, which makes per-tick controller output traceable to `drive_ctrl` or
//! `tune_ctrl`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{info, Level};
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Targets whose output is capped regardless of the requested level.
const CAPPED_TARGETS: &[(&str, LevelFilter)] = &[("zmq", LevelFilter::Info)];

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level of at least `INFO`, found `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// `min_level` must be at least as verbose as `Info`. Targets listed in
/// `CAPPED_TARGETS` (the zmq bindings) never log below their cap.
///
/// Must only be called once per process.
pub fn logger_init(
    min_level: LevelFilter,
    session: &session::Session
) -> Result<(), LoggerInitError> {
    check_min_level(min_level)?;

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}{}",
                line_prefix(
                    session::get_elapsed_seconds(),
                    record.level(),
                    record.target()
                ),
                message
            ))
        })
        .level(min_level);

    CAPPED_TARGETS
        .iter()
        .fold(dispatch, |d, (target, cap)| d.level_for(*target, (*cap).min(min_level)))
        .chain(std::io::stdout())
        .chain(log_file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised at {:?}", min_level);
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn check_min_level(min_level: LevelFilter) -> Result<(), LoggerInitError> {
    match min_level < Level::Info {
        true => Err(LoggerInitError::InvalidMinLogLevel(min_level)),
        false => Ok(())
    }
}

/// Build the start of a log line, everything before the message itself.
fn line_prefix(elapsed_s: f64, level: Level, target: &str) -> String {
    match level > Level::Info {
        true => format!("[{:10.6} {}] {}: ", elapsed_s, level_tag(level), target),
        false => format!("[{:10.6} {}] ", elapsed_s, level_tag(level))
    }
}

fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Trace => "TRC".dimmed().italic(),
        Level::Debug => "DBG".dimmed(),
        Level::Info  => "INF".normal(),
        Level::Warn  => "WRN".yellow(),
        Level::Error => "ERR".red().bold()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
