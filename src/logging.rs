use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "TANGO_LOG";

/// Keeps the background log writer alive; drop it last.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// `cli` beats `TANGO_LOG`, which beats the config file.
pub fn resolve_level(cli: Option<&str>, config: &str) -> String {
    cli.map(str::to_string)
        .or_else(|| std::env::var(LOG_ENV).ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| config.to_string())
}

/// Route tracing output to a daily-rolling file; the terminal belongs to the UI.
pub fn init_tracing(log_level: &str, log_dir: &Path) -> Option<FileLogGuard> {
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if let Err(err) = std::fs::create_dir_all(log_dir) {
        eprintln!("failed to create log directory {}: {err}", log_dir.display());
        return None;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "tango.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        return None;
    }

    Some(FileLogGuard { _guard: guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_wins() {
        assert_eq!(resolve_level(Some("trace"), "info"), "trace");
    }

    #[test]
    fn config_level_is_last_resort() {
        if std::env::var(LOG_ENV).is_err() {
            assert_eq!(resolve_level(None, "warn"), "warn");
        }
    }
}
