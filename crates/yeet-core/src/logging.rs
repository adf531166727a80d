//! Structured logging for yeet
//!
//! Diagnostics go through `tracing` to stderr (and optionally a file) so
//! they never interleave with the messages the CLI prints on stdout.
//!
//! Initialize logging once at startup:
//!
//! ```ignore
//! use yeet_core::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::default())?;
//! ```
//!
//! Field names used in events: `name` (record key), `path`, `expires_at`,
//! `now`, `expired`, `removed`.

pub use crate::config::LogFormat;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::SystemTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Logging configuration (`[logging]` in `yeet.toml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level filter; `RUST_LOG` wins when set
    pub level: String,

    pub format: LogFormat,

    /// Also write every event to this file
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to open log file: {0}")]
    FileCreate(#[from] io::Error),

    #[error("failed to set global subscriber: {0}")]
    SetSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), LogError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_layer = match &config.file {
        Some(path) => Some(event_layer(
            config.format,
            Arc::new(open_log_file(path)?),
            false,
        )),
        None => None,
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(event_layer(config.format, io::stderr, true))
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(
        log_level = %config.level,
        log_format = %config.format,
        log_file = ?config.file,
        "Logging initialized"
    );
    Ok(())
}

/// One output of the subscriber. Pretty output is a single untimed line
/// per event, since it shares the terminal with the CLI's own messages.
fn event_layer<S, W>(format: LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(writer)
            .without_time()
            .with_target(false)
            .with_ansi(ansi)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_timer(SystemTime)
            .with_target(true)
            .with_current_span(false)
            .with_span_list(false)
            .flatten_event(true)
            .boxed(),
    }
}

/// Open `path` for appending, creating it (and its parent) owner-only.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    options.mode(0o600);
    options.open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// A mock writer that captures output to a shared buffer for testing
    #[derive(Clone)]
    struct MockLogWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl MockLogWriter {
        fn new() -> Self {
            Self {
                buffer: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn contents(&self) -> String {
            String::from_utf8(self.buffer.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for MockLogWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for MockLogWriter {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.file.is_none());
    }

    #[test]
    fn log_config_serde_roundtrip() {
        let config = LogConfig {
            level: "debug".to_string(),
            format: LogFormat::Json,
            file: Some(PathBuf::from("/tmp/yeet.log")),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: LogConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.level, config.level);
        assert_eq!(parsed.format, config.format);
        assert_eq!(parsed.file, config.file);
    }

    fn capture<F: FnOnce()>(format: LogFormat, emit: F) -> String {
        let writer = MockLogWriter::new();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("info"))
            .with(event_layer(format, writer.clone(), false));
        tracing::subscriber::with_default(subscriber, emit);
        writer.contents()
    }

    #[test]
    fn json_events_are_one_object_per_line() {
        let output = capture(LogFormat::Json, || {
            tracing::info!(name = "notes.txt", expires_at = 1_700_604_800_i64, "Yeeted file");
        });

        let line = output.lines().find(|line| !line.trim().is_empty()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();

        assert!(parsed.get("timestamp").is_some());
        assert_eq!(parsed.get("name").and_then(|v| v.as_str()), Some("notes.txt"));
        assert_eq!(
            parsed.get("expires_at").and_then(serde_json::Value::as_i64),
            Some(1_700_604_800)
        );
    }

    #[test]
    fn pretty_events_are_plain_single_lines() {
        let output = capture(LogFormat::Pretty, || {
            tracing::info!(removed = 3_u64, "Emptied yeet bin");
        });

        assert_eq!(output.lines().count(), 1, "{output}");
        assert!(output.contains("INFO"));
        assert!(output.contains("Emptied yeet bin"));
        assert!(output.contains("removed=3"));
        assert!(!output.contains('\u{1b}'), "no ANSI escapes: {output:?}");
    }

    #[test]
    fn events_below_filter_are_dropped() {
        let output = capture(LogFormat::Pretty, || {
            tracing::debug!("Created empty record store");
        });
        assert!(output.is_empty());
    }

    #[test]
    fn log_file_is_created_with_parent() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("logs/nested/yeet.log");

        let mut file = open_log_file(&path).unwrap();
        io::Write::write_all(&mut file, b"first\n").unwrap();
        drop(file);
        let mut file = open_log_file(&path).unwrap();
        io::Write::write_all(&mut file, b"second\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[cfg(unix)]
    #[test]
    fn log_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("yeet.log");
        open_log_file(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
