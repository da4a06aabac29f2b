//! File-based logging initialization

use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use super::config::{LogConfig, DEFAULT_LOG_FILTER, LOG_FILE_NAME};

/// Initialize the logging system
///
/// Sets up:
/// - Daily log rotation in `config.log_dir`
/// - Plain or JSON file output
/// - Optional console layer
/// - Non-blocking writes
/// - Panic hook that logs the panic before the default handler runs
///
/// Returns the writer guard; dropping it flushes and stops the file writer.
/// Returns `None` when the log directory cannot be created or a global
/// subscriber is already installed. Logging is then left as it was.
pub fn init(config: &LogConfig) -> Option<WorkerGuard> {
    if let Err(e) = fs::create_dir_all(&config.log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let file_layer = if config.json {
        fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_current_span(true)
            .with_span_list(true)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false) // No ANSI codes in log files
            .boxed()
    };

    let console_layer = config
        .stdout
        .then(|| fmt::layer().with_target(false).compact().boxed());

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    if let Err(e) = installed {
        eprintln!("Warning: Logging already initialized: {}", e);
        return None;
    }

    tracing::info!(
        log_file = %config.log_file().display(),
        log_level = %config.log_level,
        json = config.json,
        stdout = config.stdout,
        "Logging initialized"
    );

    setup_panic_hook();
    Some(guard)
}

/// Set up panic hook to log panics with their location
fn setup_panic_hook() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic message".to_string()
        };

        tracing::error!(
            location = %location,
            message = %message,
            "Application panic"
        );

        default_panic(panic_info);
    }));
}
