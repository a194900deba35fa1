#![deny(missing_docs)]
//! Shared logging utilities for the mission monitor workspace.
//!
//! This crate provides the `mission_*` logging macros used across the codebase,
//! the logger setup used by the terminal app, and a minimal test initializer.
//!
//! Diagnostic logging is unrelated to the mission event log shown to the user;
//! that one lives in `mission_core`.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Default log file, relative to the current working directory.
pub const DEFAULT_LOG_FILE: &str = "./mission_monitor.log";

/// Re-export for the macros below.
#[doc(hidden)]
pub use log as __log;

/// `log::trace!` under the workspace's name.
#[macro_export]
macro_rules! mission_trace {
    ($($arg:tt)*) => {
        $crate::__log::trace!($($arg)*)
    };
}

/// `log::debug!` under the workspace's name.
#[macro_export]
macro_rules! mission_debug {
    ($($arg:tt)*) => {
        $crate::__log::debug!($($arg)*)
    };
}

/// `log::info!` under the workspace's name.
#[macro_export]
macro_rules! mission_info {
    ($($arg:tt)*) => {
        $crate::__log::info!($($arg)*)
    };
}

/// `log::warn!` under the workspace's name.
#[macro_export]
macro_rules! mission_warn {
    ($($arg:tt)*) => {
        $crate::__log::warn!($($arg)*)
    };
}

/// `log::error!` under the workspace's name.
#[macro_export]
macro_rules! mission_error {
    ($($arg:tt)*) => {
        $crate::__log::error!($($arg)*)
    };
}

/// Destination for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to the given file, truncating it first.
    File(PathBuf),
    /// Write to the terminal (stderr for warnings and errors).
    Terminal,
    /// Write to both the file and the terminal.
    Both(PathBuf),
}

impl Default for LogDestination {
    fn default() -> Self {
        LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE))
    }
}

/// Initialize the global logger with the specified destination.
///
/// A file that cannot be created is reported on stderr and skipped; the
/// remaining destinations are still installed. Calling this twice is harmless,
/// the second call is ignored.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File(path) => match create_file_logger(&path, level, config) {
            Some(file_logger) => vec![file_logger],
            None => return,
        },
        LogDestination::Terminal => vec![TermLogger::new(
            level,
            config,
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )],
        LogDestination::Both(path) => {
            let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
                level,
                config.clone(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            )];
            if let Some(file_logger) = create_file_logger(&path, level, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
}

/// Terminal logger for test binaries. Does nothing once any logger is set.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
