use std::path::{Path, PathBuf};

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Flushes buffered log lines when dropped; hold it for the life of the process.
#[must_use = "dropping the guard stops log output"]
pub struct LogGuard {
    _file: WorkerGuard,
    _stdout: WorkerGuard,
}

/// Install the tracing subscriber: plain text to `<log_dir>/<service>.log`
/// and colored output to stdout. The file from the previous run is moved
/// aside first, so each run starts a fresh log.
///
/// `RUST_LOG` takes precedence over `log_level`.
pub fn init_logging(log_dir: &str, service_name: &str, log_level: &str) -> anyhow::Result<LogGuard> {
    std::fs::create_dir_all(log_dir)?;
    let rotated = rotate_logs_on_startup(log_dir, service_name)?;

    let (file_writer, file_guard) = non_blocking(rolling::never(log_dir, format!("{service_name}.log")));
    let (stdout_writer, stdout_guard) = non_blocking(std::io::stdout());

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.to_ascii_lowercase()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(fmt::layer().with_writer(stdout_writer).with_target(false))
        .try_init()?;

    info!("Logging to {}/{}.log at level {}", log_dir, service_name, log_level);
    if let Some(backup) = rotated {
        info!("Previous log moved to {}", backup.display());
    }

    Ok(LogGuard { _file: file_guard, _stdout: stdout_guard })
}

/// Move a log left by a previous run aside as `<service>.<timestamp>.log`.
pub fn rotate_logs_on_startup(log_dir: &str, service_name: &str) -> anyhow::Result<Option<PathBuf>> {
    let current = Path::new(log_dir).join(format!("{service_name}.log"));
    if !current.exists() {
        return Ok(None);
    }

    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let backup = Path::new(log_dir).join(format!("{service_name}.{stamp}.log"));
    std::fs::rename(&current, &backup)?;
    Ok(Some(backup))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_startup_rotates_the_written_log() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().to_str().unwrap();

        let guard = init_logging(log_dir, "parley", "info").unwrap();
        info!("first run");
        drop(guard);

        let current = dir.path().join("parley.log");
        assert!(std::fs::read_to_string(&current).unwrap().contains("first run"));

        let backup = rotate_logs_on_startup(log_dir, "parley").unwrap().unwrap();
        assert!(!current.exists());
        assert!(std::fs::read_to_string(backup).unwrap().contains("first run"));
    }

    #[test]
    fn rotation_without_log_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let rotated = rotate_logs_on_startup(dir.path().to_str().unwrap(), "parley").unwrap();
        assert!(rotated.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
