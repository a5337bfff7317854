//! Utilities: logging (dynamic level, stderr), terminal styling and table
//! rendering for human output.
//!
//! Key items:
//!   init_logging / level_from_env
//!   log_error! / log_info! / log_debug! / log_trace!
//!   format::* (StyleOptions, color, tablify)

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub mod format;

/// Logging helpers.
pub mod logging {
    use super::*;

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
    pub enum LogLevel {
        Error = 0,
        Info = 1,
        Debug = 2,
        Trace = 3,
    }

    impl LogLevel {
        pub fn as_str(&self) -> &'static str {
            match self {
                LogLevel::Error => "ERROR",
                LogLevel::Info => "INFO",
                LogLevel::Debug => "DEBUG",
                LogLevel::Trace => "TRACE",
            }
        }

        /// Case-insensitive parser for level names (`error|info|debug|trace`).
        pub fn from_str_ci(s: &str) -> Option<Self> {
            match s.trim().to_ascii_lowercase().as_str() {
                "error" => Some(LogLevel::Error),
                "info" => Some(LogLevel::Info),
                "debug" => Some(LogLevel::Debug),
                "trace" => Some(LogLevel::Trace),
                _ => None,
            }
        }
    }

    static GLOBAL_LEVEL: OnceLock<AtomicU8> = OnceLock::new();

    fn inner_cell() -> &'static AtomicU8 {
        GLOBAL_LEVEL.get_or_init(|| AtomicU8::new(LogLevel::Info as u8))
    }

    pub fn init_logging(level: LogLevel) {
        set_log_level(level);
    }

    pub fn set_log_level(level: LogLevel) {
        inner_cell().store(level as u8, Ordering::Relaxed);
    }

    pub fn current_log_level() -> LogLevel {
        match inner_cell().load(Ordering::Relaxed) {
            0 => LogLevel::Error,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// Level named by `raw` (usually `<PREFIX>_LOG`); unknown or missing -> Info.
    pub fn level_from_env(raw: Option<&str>) -> LogLevel {
        raw.and_then(LogLevel::from_str_ci).unwrap_or(LogLevel::Info)
    }

    fn timestamp() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0)
    }

    fn should_emit(level: LogLevel) -> bool {
        level <= current_log_level()
    }

    // stdout belongs to the dispatched command.
    pub fn log(level: LogLevel, msg: impl AsRef<str>) {
        if should_emit(level) {
            eprintln!("[{}][{}] {}", level.as_str(), timestamp(), msg.as_ref());
        }
    }

    pub fn error(msg: impl AsRef<str>) {
        log(LogLevel::Error, msg);
    }
    pub fn info(msg: impl AsRef<str>) {
        log(LogLevel::Info, msg);
    }
    pub fn debug(msg: impl AsRef<str>) {
        log(LogLevel::Debug, msg);
    }
    pub fn trace(msg: impl AsRef<str>) {
        log(LogLevel::Trace, msg);
    }

    #[macro_export]
    macro_rules! log_error {
        ($($t:tt)*) => { $crate::utils::logging::error(format!($($t)*)) };
    }
    #[macro_export]
    macro_rules! log_info {
        ($($t:tt)*) => { $crate::utils::logging::info(format!($($t)*)) };
    }
    #[macro_export]
    macro_rules! log_debug {
        ($($t:tt)*) => { $crate::utils::logging::debug(format!($($t)*)) };
    }
    #[macro_export]
    macro_rules! log_trace {
        ($($t:tt)*) => { $crate::utils::logging::trace(format!($($t)*)) };
    }
}

pub use logging::{LogLevel, init_logging, level_from_env};
