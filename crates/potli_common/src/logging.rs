//! Logging utilities for the Potli backend.
//!
//! All crates log through `tracing`. [`init`] installs the subscriber once at
//! start-up:
//!
//! - stdout fmt layer with targets, file/line and thread ids
//! - a daily rolling file under `LOG_DIR` when that variable is set
//! - journald on Linux when `LOG_JOURNALD=1`
//!
//! `RUST_LOG` directives are honoured on top of the `potli=<level>` default.

use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Keeps the non-blocking file writer alive. Hold it until shutdown.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Initialise logging at INFO.
///
/// ```
/// let _guard = potli_common::logging::init();
/// ```
pub fn init() -> LoggingGuard {
    init_with_level(Level::INFO)
}

/// Initialise logging with an explicit minimum level for Potli crates.
pub fn init_with_level(level: Level) -> LoggingGuard {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match format!("potli={}", level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("invalid log directive: {e}"),
    }

    let (file_layer, file_guard) = match std::env::var("LOG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => {
            let appender = tracing_appender::rolling::daily(dir.trim(), "potli.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    #[cfg(target_os = "linux")]
    let journald = journald_layer();
    #[cfg(not(target_os = "linux"))]
    let journald: Option<tracing_subscriber::layer::Identity> = None;

    // try_init: a global subscriber may already be set (tests, embedding)
    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .with(file_layer)
        .with(journald)
        .try_init();

    if result.is_ok() {
        info!("✅ Logging initialized at level: {}", level);
    }

    LoggingGuard { _file: file_guard }
}

#[cfg(target_os = "linux")]
fn journald_layer() -> Option<tracing_journald::Layer> {
    if std::env::var("LOG_JOURNALD").map(|v| v == "1").unwrap_or(false) {
        match tracing_journald::layer() {
            Ok(layer) => Some(layer.with_syslog_identifier("potli".to_string())),
            Err(e) => {
                eprintln!("journald unavailable, continuing without it: {e}");
                None
            }
        }
    } else {
        None
    }
}
