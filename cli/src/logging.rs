//! Tracing setup for the binary.
//!
//! Logging never keeps the child from starting. A bad filter falls back to
//! `info`, an unusable log directory disables the file sink, and each such
//! step is returned as a note for the caller to log once tracing is up.
use std::path::PathBuf;
use std::sync::Mutex;

use sieve_core::config::LoggingConfig;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_PREFIX: &str = "stdio-sieve.log";
const FALLBACK_LEVEL: &str = "info";

static LOG_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

/// Installs the global subscriber described by `logging`.
pub fn init(logging: &LoggingConfig) -> Vec<String> {
    let mut notes = Vec::new();
    if !logging.enabled {
        return notes;
    }

    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = build_filter(rust_log.as_deref(), &logging.level, &mut notes);

    let file_writer = if logging.file {
        file_writer(logging.directory.as_deref(), &mut notes)
    } else {
        None
    };

    if !logging.console && file_writer.is_none() {
        return notes;
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });
    let file_layer = file_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
            .with_target(false)
    });

    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
    {
        notes.push(format!("tracing subscriber not installed: {e}"));
    }
    notes
}

/// Drops the file writer's guard so buffered lines reach disk. Needed before
/// `std::process::exit`, which skips destructors.
pub fn flush() {
    if let Ok(mut guard) = LOG_GUARD.lock() {
        drop(guard.take());
    }
}

/// `RUST_LOG` wins when set; otherwise the configured level. An invalid
/// directive falls back to `info`.
fn build_filter(rust_log: Option<&str>, level: &str, notes: &mut Vec<String>) -> EnvFilter {
    let (source, directives) = match rust_log.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => ("RUST_LOG", v),
        None => ("logging.level", level),
    };

    match EnvFilter::try_new(directives) {
        Ok(filter) => filter,
        Err(e) => {
            notes.push(format!(
                "invalid {source} {directives:?} ({e}); using {FALLBACK_LEVEL}"
            ));
            EnvFilter::new(FALLBACK_LEVEL)
        }
    }
}

fn log_dir(configured: Option<&str>) -> PathBuf {
    match configured.map(str::trim).filter(|s| !s.is_empty()) {
        Some(d) => PathBuf::from(d),
        None => std::env::temp_dir().join("stdio-sieve"),
    }
}

fn file_writer(configured: Option<&str>, notes: &mut Vec<String>) -> Option<NonBlocking> {
    let dir = log_dir(configured);
    let appender = std::fs::create_dir_all(&dir)
        .map_err(|e| e.to_string())
        .and_then(|()| {
            RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .build(&dir)
                .map_err(|e| e.to_string())
        });

    match appender {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            if let Ok(mut slot) = LOG_GUARD.lock() {
                *slot = Some(guard);
            }
            Some(writer)
        }
        Err(e) => {
            notes.push(format!(
                "file logging disabled, cannot use {}: {e}",
                dir.display()
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn configured_level_is_used_when_rust_log_is_unset() {
        let mut notes = Vec::new();
        let filter = build_filter(None, "debug", &mut notes);
        assert!(notes.is_empty());
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn rust_log_takes_precedence_over_configured_level() {
        let mut notes = Vec::new();
        let filter = build_filter(Some("warn"), "debug", &mut notes);
        assert!(notes.is_empty());
        assert_eq!(filter.to_string(), "warn");

        let filter = build_filter(Some("   "), "debug", &mut notes);
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn invalid_level_falls_back_to_info() {
        let mut notes = Vec::new();
        let filter = build_filter(None, "[bad", &mut notes);
        assert_eq!(filter.to_string(), "info");
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("logging.level"));
    }

    #[test]
    fn blank_directory_uses_temp_dir() {
        assert_eq!(log_dir(Some("  ")), std::env::temp_dir().join("stdio-sieve"));
        assert_eq!(log_dir(Some("/var/log/sieve")), PathBuf::from("/var/log/sieve"));
    }

    #[test]
    fn unusable_log_directory_disables_file_sink() {
        // A regular file where the directory should be.
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let dir = blocker.path().join("logs");

        let mut notes = Vec::new();
        let writer = file_writer(dir.to_str(), &mut notes);

        assert!(writer.is_none());
        assert_eq!(notes.len(), 1);
        assert!(notes[0].starts_with("file logging disabled"));
    }

    #[test]
    fn writable_directory_yields_a_file_sink() {
        let dir = tempfile::tempdir().unwrap();
        let mut notes = Vec::new();

        let writer = file_writer(dir.path().to_str(), &mut notes);

        assert!(writer.is_some());
        assert!(notes.is_empty());
        flush();
    }
}
