use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::{LoggingConfig, ResolvedOutputs};

/// Keeps the background writer alive; dropping it flushes the telemetry file.
pub struct LoggingGuard {
    _worker: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Routes engine and harness events as JSON lines into `outputs.telemetry`.
///
/// `RUST_LOG` overrides the filter built from `logging`. Returns `None` when
/// structured logging is disabled.
pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let telemetry_path = outputs.telemetry.clone();
    if let Some(dir) = telemetry_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
    {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating telemetry directory at {}", dir.display()))?;
    }
    let file = File::create(&telemetry_path)
        .with_context(|| format!("creating telemetry file at {}", telemetry_path.display()))?;

    let (writer, worker) = NonBlockingBuilder::default().lossy(false).finish(file);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_directives()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_target(true)
        .with_writer(writer)
        .finish();

    // Only the first install in a process takes effect.
    let _ = tracing::subscriber::set_global_default(subscriber);

    Ok(Some(LoggingGuard {
        _worker: worker,
        telemetry_path,
    }))
}

#[cfg(test)]
mod tests {
    use super::init_logging;
    use crate::config::{LoggingConfig, ResolvedOutputs};
    use std::path::Path;

    fn outputs(dir: &Path) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: dir.join("games.jsonl"),
            summary_md: dir.join("summary.md"),
            telemetry: dir.join("logs").join("run.jsonl"),
        }
    }

    #[test]
    fn disabled_logging_installs_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let guard = init_logging(&LoggingConfig::default(), &outputs(dir.path())).expect("init");
        assert!(guard.is_none());
        assert!(!dir.path().join("logs").exists());
    }

    #[test]
    fn enabled_logging_creates_the_configured_telemetry_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let logging = LoggingConfig {
            enable_structured: true,
            ..LoggingConfig::default()
        };
        let guard = init_logging(&logging, &outputs(dir.path()))
            .expect("init")
            .expect("guard when enabled");
        assert_eq!(guard.telemetry_path, dir.path().join("logs").join("run.jsonl"));
        assert!(guard.telemetry_path.exists());
    }
}
