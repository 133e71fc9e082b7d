//! Diagnostic logging for the `previewfit` binary.
//!
//! Library code logs through the `log` facade: supported and ranked sizes,
//! chosen capture size, layout branch, lifecycle warnings. Nothing is printed
//! unless a logger is installed. The binary installs [`StderrLogger`] so
//! diagnostics never mix with the command output on stdout.

use log::{LevelFilter, Log, Metadata, Record};
use std::io::Write;

/// A logger that writes `[LEVEL] target - message` lines to stderr.
pub struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!("[{}] {} - {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {
        std::io::stderr().flush().ok();
    }
}

/// Map the number of `-v` flags to a level filter.
///
/// - 0: warnings and errors
/// - 1: info
/// - 2: debug (ranked sizes, layout decisions)
/// - 3+: trace
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install [`StderrLogger`] as the global logger.
///
/// This can only be called once per process. Subsequent calls are silently ignored.
pub fn init_stderr_logger(verbosity: u8) {
    static LOGGER: StderrLogger = StderrLogger;

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level_for_verbosity(verbosity));
    }
}
