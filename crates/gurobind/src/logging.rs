//! Subscriber setup for the crate's `tracing` events.
//!
//! Every event the binding emits carries `component`, `operation` and
//! `status` fields; native failures add `status_code`. [`init_logging`] is an
//! opt-in convenience for applications that have no subscriber of their own.
//! It is configured through `GUROBIND_*` environment variables and reports
//! problems as [`LoggingError`] instead of panicking.

use std::env;
use std::fs::{File, OpenOptions};
use std::io;
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the log subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),
    #[error("invalid GUROBIND_LOG_FORMAT `{0}` (expected 'json' or 'pretty')")]
    InvalidFormat(String),
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to initialize logging: {0}")]
    Init(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn log_format(value: &str) -> Result<LogFormat, LoggingError> {
    if value.eq_ignore_ascii_case("pretty") {
        Ok(LogFormat::Pretty)
    } else if value.eq_ignore_ascii_case("json") {
        Ok(LogFormat::Json)
    } else {
        Err(LoggingError::InvalidFormat(value.to_string()))
    }
}

/// `off` disables everything; anything else is an `EnvFilter` directive.
fn level_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if level.eq_ignore_ascii_case("off") {
        return Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()));
    }
    EnvFilter::try_new(level).map_err(|err| LoggingError::InvalidFilter(err.to_string()))
}

fn fmt_layer<W>(writer: W, format: LogFormat, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    match format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

fn open_log_file(path: &str) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::LogFile {
            path: path.to_string(),
            source,
        })
}

/// Install a global `tracing` subscriber.
///
/// When `level` is `None`, this reads `GUROBIND_TRACE` if set; otherwise
/// logging is `off`. `GUROBIND_LOG_FORMAT` selects `pretty` (default) or
/// `json` output on stderr, and `GUROBIND_LOG_FILE` additionally appends to a
/// file in the same format. Returns `Ok(false)` if a subscriber is already
/// configured.
pub fn init_logging(level: Option<&str>) -> Result<bool, LoggingError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level = level
        .map(str::to_string)
        .or_else(|| env::var("GUROBIND_TRACE").ok())
        .unwrap_or_else(|| "off".to_string());
    let filter = level_filter(&level)?;
    let format = match env::var("GUROBIND_LOG_FORMAT") {
        Ok(value) => log_format(&value)?,
        Err(_) => LogFormat::Pretty,
    };

    let mut layers = vec![fmt_layer(io::stderr, format, true)];
    if let Ok(path) = env::var("GUROBIND_LOG_FILE") {
        layers.push(fmt_layer(Mutex::new(open_log_file(&path)?), format, false));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|err| LoggingError::Init(err.to_string()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_existing_subscriber() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
        assert!(matches!(init_logging(Some("debug")), Ok(false)));
    }

    #[test]
    fn test_log_format_is_case_insensitive() {
        assert_eq!(log_format("JSON").unwrap(), LogFormat::Json);
        assert_eq!(log_format("pretty").unwrap(), LogFormat::Pretty);
        let err = log_format("yaml").unwrap_err();
        assert!(err.to_string().contains("`yaml`"));
    }

    #[test]
    fn test_level_filter_rejects_bad_directive() {
        assert!(level_filter("OFF").is_ok());
        assert!(level_filter("gurobind=debug").is_ok());
        assert!(matches!(
            level_filter("gurobind=loud"),
            Err(LoggingError::InvalidFilter(_))
        ));
    }
}
