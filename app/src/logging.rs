//! FILENAME: app/src/logging.rs
// PURPOSE: Unified logging for the command line tool.
// FORMAT: seq|level|category|message, where category is the `log` target
// (LOAD, LAYOUT, RENDER, SESSION). Lines go to stderr and, optionally, a file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;

use crate::error::AppError;

/// Environment variable holding the log level (error, warn, info, debug, trace).
pub const LOG_LEVEL_ENV: &str = "FORESTPLOT_LOG";

// ============================================================================
// UNIFIED LOGGING SYSTEM
// ============================================================================

/// Global sequence counter
static LOG_SEQ: AtomicU64 = AtomicU64::new(0);

/// Global log file handle
pub static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

static LOGGER: UnifiedLogger = UnifiedLogger;

/// Get next sequence number
pub fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst) + 1
}

/// One-letter level code used in the log line.
pub fn level_code(level: Level) -> &'static str {
    match level {
        Level::Error => "E",
        Level::Warn => "W",
        Level::Info => "I",
        Level::Debug => "D",
        Level::Trace => "T",
    }
}

/// Build a log line in unified format
pub fn format_line(seq: u64, level: &str, category: &str, message: &str) -> String {
    format!("{}|{}|{}|{}", seq, level, category, message)
}

/// Write a log line in unified format
pub fn write_log(level: &str, category: &str, message: &str) {
    let line = format_line(next_seq(), level, category, message);

    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *guard {
            if let Err(e) = writeln!(file, "{}", line) {
                eprintln!("[LOG_ERROR] Failed to write: {}", e);
            }
            let _ = file.flush();
        }
    }

    eprintln!("{}", line);
}

/// Level from FORESTPLOT_LOG, falling back to `default`.
pub fn level_from_env(default: LevelFilter) -> LevelFilter {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|value| LevelFilter::from_str(value.trim()).ok())
        .unwrap_or(default)
}

/// Install the logger. Safe to call more than once; later calls only
/// change the level and the log file.
pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<(), AppError> {
    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        let mut guard = LOG_FILE
            .lock()
            .map_err(|e| AppError::Logging(format!("Lock error: {}", e)))?;
        *guard = Some(file);
    }

    // Only fails if a logger is already installed, which is fine here
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
    Ok(())
}

/// `log` backend that forwards every record to `write_log`.
struct UnifiedLogger;

impl Log for UnifiedLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            write_log(
                level_code(record.level()),
                record.target(),
                &record.args().to_string(),
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = LOG_FILE.lock() {
            if let Some(ref mut file) = *guard {
                let _ = file.flush();
            }
        }
    }
}

// ============================================================================
// MACRO DEFINITIONS & EXPORTS
// ============================================================================

// ENTER/EXIT macros for function tracing

#[macro_export]
macro_rules! log_enter {
    ($cat:expr, $func:expr) => {
        log::debug!(target: $cat, "ENTER {}", $func)
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        log::debug!(target: $cat, "ENTER {} {}", $func, format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_exit {
    ($cat:expr, $func:expr) => {
        log::debug!(target: $cat, "EXIT {}", $func)
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        log::debug!(target: $cat, "EXIT {} {}", $func, format!($($arg)*))
    };
}

pub use log_enter;
pub use log_exit;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        assert_eq!(format_line(7, "I", "LOAD", "Loaded 5 rows"), "7|I|LOAD|Loaded 5 rows");
    }

    #[test]
    fn test_level_codes() {
        assert_eq!(level_code(Level::Error), "E");
        assert_eq!(level_code(Level::Debug), "D");
    }

    #[test]
    fn test_seq_is_increasing() {
        let a = next_seq();
        let b = next_seq();
        assert!(b > a);
    }

    #[test]
    fn test_init_writes_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forestplot.log");
        init(LevelFilter::Info, Some(&path)).unwrap();

        log::info!(target: "SESSION", "hello from the test");
        log::logger().flush();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("|I|SESSION|hello from the test"));

        // Detach the file so other tests do not write into a deleted directory
        if let Ok(mut guard) = LOG_FILE.lock() {
            *guard = None;
        }
    }
}
