use anyhow::Result;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::BuilderConfig;

/// Base name of the daily rolling log file.
const LOG_FILE_PREFIX: &str = "vitrine";

/// Crates that always log at debug, whatever the configured base level.
const CRATE_DIRECTIVES: &str = "vitrine_core=debug,vitrine_docs=debug";

/// Filter used when `RUST_LOG` is unset: the configured base level plus
/// debug output for this workspace. A blank level falls back to `info`.
pub fn filter_directives(config: &BuilderConfig) -> String {
    let level = config.log_level.trim();
    let level = if level.is_empty() { "info" } else { level };
    format!("{level},{CRATE_DIRECTIVES}")
}

/// `RUST_LOG` wins; otherwise `directives`.
fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

/// Installs file logging under `~/.vitrine/logs` plus a compact console
/// layer, filtered by `config.log_level`. Keep the returned guard alive for
/// the life of the process or buffered lines are lost.
pub fn init_logging(config: &BuilderConfig) -> Result<WorkerGuard> {
    let logs_dir = BuilderConfig::logs_dir()?;
    std::fs::create_dir_all(&logs_dir)?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&logs_dir, LOG_FILE_PREFIX));

    tracing_subscriber::registry()
        .with(env_filter(&filter_directives(config)))
        .with(fmt::layer().with_target(true).with_writer(file_writer))
        .with(fmt::layer().with_target(false).compact())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    tracing::info!(
        "Logging to {} at level {}",
        logs_dir.display(),
        config.log_level
    );
    Ok(guard)
}

/// File-only logging into `logs_dir` with an explicit filter, for tests and
/// embedders that do not own `~/.vitrine`.
pub fn init_logging_to_dir(logs_dir: &Path, filter: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX));

    tracing_subscriber::registry()
        .with(env_filter(filter))
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_reaches_filter() {
        let config = BuilderConfig {
            log_level: "warn".into(),
            ..Default::default()
        };
        assert_eq!(
            filter_directives(&config),
            "warn,vitrine_core=debug,vitrine_docs=debug"
        );
        assert!(EnvFilter::try_new(filter_directives(&config)).is_ok());
    }

    #[test]
    fn test_default_and_blank_level_use_info() {
        let default = BuilderConfig::default();
        assert_eq!(
            filter_directives(&default),
            "info,vitrine_core=debug,vitrine_docs=debug"
        );

        let blank = BuilderConfig {
            log_level: "  ".into(),
            ..Default::default()
        };
        assert_eq!(filter_directives(&blank), filter_directives(&default));
    }

    #[test]
    fn test_init_logging_to_dir_creates_directory() {
        let tmp = tempfile::tempdir().expect("Failed to create tempdir");
        let logs_dir = tmp.path().join("nested").join("logs");
        assert!(!logs_dir.exists());

        // Only one global subscriber per process; another test may own it.
        let _ = init_logging_to_dir(&logs_dir, "warn");
        assert!(logs_dir.exists());
    }

    #[test]
    fn test_init_logging_to_dir_reports_second_init() {
        let tmp = tempfile::tempdir().expect("Failed to create tempdir");
        let first = init_logging_to_dir(&tmp.path().join("a"), "info");
        let second = init_logging_to_dir(&tmp.path().join("b"), "info");

        assert!(first.is_err() || second.is_err());
        if let Err(e) = second {
            assert!(e.to_string().contains("logging"), "unexpected error: {e}");
        }
    }
}
