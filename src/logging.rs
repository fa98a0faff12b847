//! Tracing subscriber setup.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

/// Where log lines go.
pub enum LogTarget<'a> {
    Stderr,
    /// Append to a file. Used while the terminal UI owns the screen.
    File(&'a Path),
}

fn env_filter(default_level: &str) -> EnvFilter {
    // RUST_LOG wins over the configured level.
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level).unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Install the global subscriber. Calling it twice is harmless; the second call is ignored.
pub fn init(default_level: &str, target: LogTarget<'_>) -> Result<()> {
    let filter = env_filter(default_level);
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
