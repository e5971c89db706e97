//! Logging and tracing initialization.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber with the given configuration.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let writer = make_writer(config);

    if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}

/// Log to the configured file when it can be opened, stderr otherwise.
fn make_writer(config: &LoggingConfig) -> BoxMakeWriter {
    if let Some(path) = &config.file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => return BoxMakeWriter::new(Mutex::new(file)),
            Err(e) => eprintln!("Failed to open log file {}: {e}", path.display()),
        }
    }
    BoxMakeWriter::new(std::io::stderr)
}
