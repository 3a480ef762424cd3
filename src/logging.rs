//! Logging setup for linkq using tracing.

use anyhow::Result;
use std::path::PathBuf;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Logging;

/// Initialize console logging, plus a rolling log file when enabled.
///
/// The returned guard flushes the file writer on drop and must be held for the
/// life of the program.
pub fn init(settings: &Logging) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let (writer, guard, log_dir) = match file_writer(settings)? {
        Some((writer, guard, log_dir)) => (Some(writer), Some(guard), Some(log_dir)),
        None => (None, None, None),
    };

    subscriber(filter, writer).try_init()?;

    if let Some(log_dir) = log_dir {
        tracing::debug!("Log directory: {}", log_dir.display());
    }

    Ok(guard)
}

/// Registry with the filter, an optional file layer and the stderr layer.
fn subscriber(filter: EnvFilter, file: Option<NonBlocking>) -> impl Subscriber + Send + Sync {
    let file_layer = file.map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
    });

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
}

/// Open the daily rolling log file when file logging is enabled.
fn file_writer(settings: &Logging) -> Result<Option<(NonBlocking, WorkerGuard, PathBuf)>> {
    if !settings.file {
        return Ok(None);
    }

    let log_dir = match &settings.dir {
        Some(dir) => dir.clone(),
        None => get_log_dir()?,
    };
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "linkq.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    Ok(Some((non_blocking, guard, log_dir)))
}

/// Get the default log directory path.
fn get_log_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("com", "linkq", "linkq")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

    Ok(dirs.data_dir().join("logs"))
}

/// Initialize logging for tests (console only, no file).
#[cfg(test)]
pub fn init_test() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_test_writer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_settings(dir: PathBuf) -> Logging {
        Logging {
            level: "debug".to_string(),
            file: true,
            dir: Some(dir),
        }
    }

    #[test]
    fn test_file_writer_disabled() {
        let settings = Logging {
            level: "info".to_string(),
            file: false,
            dir: None,
        };
        assert!(file_writer(&settings).unwrap().is_none());
    }

    #[test]
    fn test_file_layer_writes_to_log_dir() {
        let temp = tempfile::tempdir().unwrap();
        let settings = file_settings(temp.path().join("logs"));

        let (writer, guard, log_dir) = file_writer(&settings).unwrap().unwrap();
        assert_eq!(log_dir, temp.path().join("logs"));

        let subscriber = subscriber(EnvFilter::new("debug"), Some(writer));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("queue log line");
        });
        drop(guard);

        let files: Vec<PathBuf> = std::fs::read_dir(&log_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1);

        let contents = std::fs::read_to_string(&files[0]).unwrap();
        assert!(contents.contains("queue log line"));
    }

    #[test]
    fn test_console_only_subscriber() {
        let subscriber = subscriber(EnvFilter::new("info"), None);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("console only");
        });
    }
}
