//! Logging infrastructure for devstack.
//!
//! Structured logging using the `tracing` ecosystem. Logs go to two places:
//!
//! - JSON lines in `<log_dir>/devstack.log` (daily rolling)
//! - Human-readable output on stderr, so prompts on stdout stay clean
//!
//! ## Example
//!
//! ```no_run
//! use devstack_core::logging;
//!
//! let _guard = logging::init_logging(std::path::PathBuf::from("/tmp/devstack-logs"), false)
//!     .expect("logging init");
//!
//! tracing::info!("devstack started");
//! tracing::debug!(stack = "alpha", "validating stack name");
//! ```

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{DevstackError, Result};

/// File name of the JSON log inside the log directory.
pub const LOG_FILE_NAME: &str = "devstack.log";

/// Guard that must be held to ensure log flushing on shutdown.
///
/// Keep this guard alive for the lifetime of the application.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the devstack logging system.
///
/// # Arguments
///
/// * `log_dir` - Directory for the JSON log file; created if missing
/// * `verbose` - If true, sets log level to DEBUG. Otherwise uses INFO.
///
/// `RUST_LOG` takes precedence over `verbose` when set.
pub fn init_logging(log_dir: PathBuf, verbose: bool) -> Result<LogGuard> {
    std::fs::create_dir_all(&log_dir).map_err(|e| DevstackError::DirectoryCreation {
        path: log_dir.clone(),
        source: e,
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "devstack={default_level},devstack_core={default_level},devstack_init={default_level}"
        ))
    });

    // JSON layer for file output
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true)
        .with_span_list(true);

    // Console layer; quiet unless verbose so prompts are not drowned out
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(verbose)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_filter(if verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::WARN
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| DevstackError::internal(format!("logging already initialized: {e}")))?;

    tracing::debug!(log_dir = %log_dir.display(), verbose, "logging initialized");

    Ok(LogGuard {
        _file_guard: Some(file_guard),
    })
}

/// Initialize minimal console-only logging for testing.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Log a stage transition of the init pipeline.
///
/// # Example
///
/// ```ignore
/// log_init_stage!("stack_name", source = "argument");
/// ```
#[macro_export]
macro_rules! log_init_stage {
    ($stage:expr) => {
        tracing::debug!(
            target: "devstack::init",
            stage = $stage,
            "init stage"
        )
    };
    ($stage:expr, $($field:tt)*) => {
        tracing::debug!(
            target: "devstack::init",
            stage = $stage,
            $($field)*,
            "init stage"
        )
    };
}
