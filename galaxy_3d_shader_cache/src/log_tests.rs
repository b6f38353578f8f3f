//! Unit tests for log.rs
//!
//! Tests LogSeverity, LogEntry, DefaultLogger, the global logger slot and
//! the shader_* macros. Tests that swap the global logger run with #[serial].

use crate::error::{Error, Result};
use crate::log::{self, Logger, LogEntry, LogSeverity, DefaultLogger};
use serial_test::serial;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Logger capturing entries for verification
struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CaptureLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

/// Entries from one source; other tests in the binary may log concurrently
fn from_source(entries: &Arc<Mutex<Vec<LogEntry>>>, source: &str) -> Vec<LogEntry> {
    entries
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.source == source)
        .cloned()
        .collect()
}

fn entry(severity: LogSeverity, file: Option<&'static str>, line: Option<u32>) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "galaxy3d::ShaderDiskCache".to_string(),
        message: format!("{:?} message", severity),
        file,
        line,
    }
}

// ============================================================================
// LOG SEVERITY / LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_debug() {
    assert_eq!(format!("{:?}", LogSeverity::Trace), "Trace");
    assert_eq!(format!("{:?}", LogSeverity::Error), "Error");
}

#[test]
fn test_log_entry_clone() {
    let entry1 = entry(LogSeverity::Warn, Some("disk_cache_store.rs"), Some(10));
    let entry2 = entry1.clone();

    assert_eq!(entry1.severity, entry2.severity);
    assert_eq!(entry1.source, entry2.source);
    assert_eq!(entry1.message, entry2.message);
    assert_eq!(entry1.file, entry2.file);
    assert_eq!(entry1.line, entry2.line);
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_all_severities() {
    let logger = DefaultLogger;

    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        // Both output branches, must not panic
        logger.log(&entry(severity, None, None));
        logger.log(&entry(severity, Some("shader_manager.rs"), Some(42)));
    }
}

#[test]
fn test_logger_trait_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
}

// ============================================================================
// GLOBAL LOGGER TESTS
// ============================================================================

#[test]
#[serial]
fn test_set_logger_captures_entries() {
    let (logger, entries) = CaptureLogger::new();
    log::set_logger(logger);

    log::log(LogSeverity::Info, "test::module", "first".to_string());
    log::log_detailed(LogSeverity::Error, "test::module", "second".to_string(), "x.rs", 7);

    {
        let captured = from_source(&entries, "test::module");
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0].message, "first");
        assert!(captured[0].file.is_none());
        assert_eq!(captured[1].file, Some("x.rs"));
        assert_eq!(captured[1].line, Some(7));
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_reset_logger_stops_capture() {
    let (logger, entries) = CaptureLogger::new();
    log::set_logger(logger);
    log::reset_logger();

    log::log(LogSeverity::Info, "test::module", "not captured".to_string());
    assert!(from_source(&entries, "test::module").is_empty());
}

#[test]
#[serial]
fn test_severity_macros() {
    let (logger, entries) = CaptureLogger::new();
    log::set_logger(logger);

    crate::shader_trace!("test::macros", "trace {}", 1);
    crate::shader_debug!("test::macros", "debug {}", 2);
    crate::shader_info!("test::macros", "info {}", 3);
    crate::shader_warn!("test::macros", "warn {}", 4);
    crate::shader_error!("test::macros", "error {}", 5);

    {
        let captured = from_source(&entries, "test::macros");
        let severities: Vec<LogSeverity> = captured.iter().map(|e| e.severity).collect();
        assert_eq!(severities, vec![
            LogSeverity::Trace,
            LogSeverity::Debug,
            LogSeverity::Info,
            LogSeverity::Warn,
            LogSeverity::Error,
        ]);
        assert_eq!(captured[2].message, "info 3");
        // Only the error macro records the call site
        assert!(captured[3].line.is_none());
        assert!(captured[4].line.is_some());
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_shader_err_logs_and_builds_variant() {
    let (logger, entries) = CaptureLogger::new();
    log::set_logger(logger);

    let err = crate::shader_err!("test::macros", PurposeNotRegistered, "'{}' is unknown", "Sky");
    assert_eq!(err, Error::PurposeNotRegistered("'Sky' is unknown".to_string()));

    {
        let captured = from_source(&entries, "test::macros");
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].severity, LogSeverity::Error);
        assert_eq!(captured[0].message, "'Sky' is unknown");
    }

    log::reset_logger();
}

#[test]
#[serial]
fn test_shader_bail_returns_error() {
    fn fails(flag: bool) -> Result<u32> {
        if flag {
            crate::shader_bail!("test::macros", InvalidConfig, "flag was {}", flag);
        }
        Ok(1)
    }

    assert_eq!(fails(false), Ok(1));
    assert_eq!(fails(true), Err(Error::InvalidConfig("flag was true".to_string())));
}
