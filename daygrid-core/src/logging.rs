//! Logging for daygrid.
//!
//! The terminal UI owns stdout, so events go to a daily rolling file at
//! `Config::log_path()`, usually `~/.local/state/daygrid/daygrid.log`.

use std::path::Path;

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Install the global subscriber.
///
/// The level comes from `RUST_LOG` when set, otherwise from `config.level`.
/// At most `config.max_files` rotated files are kept.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_path = Config::log_path();
    let appender = rolling_appender(&log_path, config.max_files)?;

    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!(
        log_path = %log_path.display(),
        level = %config.level,
        max_files = config.max_files,
        "Logging initialized"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Daily appender writing `<path>.<date>` files next to `path`.
fn rolling_appender(path: &Path, max_files: usize) -> Result<RollingFileAppender> {
    let (Some(dir), Some(prefix)) = (path.parent(), path.file_name()) else {
        return Err(Error::Config(format!("invalid log path: {}", path.display())));
    };
    std::fs::create_dir_all(dir)?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix.to_string_lossy())
        .max_log_files(max_files.max(1))
        .build(dir)
        .map_err(|e| Error::Config(format!("failed to create log file: {e}")))
}

/// Route events to the test harness output.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

/// Flushes buffered log lines when dropped. Hold it for the life of `main`.
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_rolling_appender_creates_directory() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("state/daygrid/daygrid.log");

        let mut appender = rolling_appender(&path, 0).unwrap();
        appender.write_all(b"hello\n").unwrap();
        appender.flush().unwrap();

        let files: Vec<_> = std::fs::read_dir(temp.path().join("state/daygrid"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].starts_with("daygrid.log"), "{files:?}");
    }

    #[test]
    fn test_rolling_appender_rejects_bare_root() {
        assert!(matches!(
            rolling_appender(Path::new("/"), 5),
            Err(Error::Config(_))
        ));
    }
}
