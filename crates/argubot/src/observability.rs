//! Tracing setup for binaries and notebooks-style experiments.
//!
//! Simulations log each turn at `debug`, each finished dialogue and eval at
//! `info`, and omitted ratings, skipped trials and campaign cost at `warn`.
//! `RUST_LOG` still applies on top of the configured level.

use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Most verbose level recorded for the `argubot` target.
    pub level: Level,
    pub target: LogTarget,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            target: LogTarget::default(),
        }
    }
}

impl ObservabilityConfig {
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }
}

/// Where log lines go.
#[derive(Debug, Clone, Default)]
pub enum LogTarget {
    #[default]
    Stderr,
    /// Truncates and writes to the file at this path.
    File(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    #[error("invalid filter directive: {0}")]
    Directive(#[from] tracing_subscriber::filter::ParseError),

    #[error("cannot open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("a global subscriber is already installed: {0}")]
    AlreadyInstalled(#[from] TryInitError),
}

fn filter(level: Level) -> Result<EnvFilter, ObservabilityError> {
    Ok(EnvFilter::from_default_env().add_directive(format!("argubot={level}").parse()?))
}

/// Installs the global tracing subscriber. Call once, early in `main`.
pub fn init(config: ObservabilityConfig) -> Result<(), ObservabilityError> {
    let subscriber = tracing_subscriber::registry().with(filter(config.level)?);

    match config.target {
        LogTarget::Stderr => {
            let layer = fmt::layer().with_writer(std::io::stderr);
            subscriber.with(layer).try_init()?;
        }
        LogTarget::File(path) => {
            let file = std::fs::File::create(path)?;
            let layer = fmt::layer().with_ansi(false).with_writer(file);
            subscriber.with(layer).try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.level, Level::WARN);
        assert!(matches!(config.target, LogTarget::Stderr));
    }

    #[test]
    fn test_filter_names_crate_target() {
        let filter = filter(Level::DEBUG).unwrap();
        assert!(filter.to_string().contains("argubot=debug"));
    }

    #[test]
    fn test_unwritable_log_file() {
        let config = ObservabilityConfig::default()
            .with_target(LogTarget::File("/nonexistent/dir/argubot.log".into()));
        assert!(matches!(init(config), Err(ObservabilityError::Io(_))));
    }
}
