//! Logging configuration and utilities.
//!
//! Structured logging goes through `tracing`; this module installs a
//! subscriber for applications that do not bring their own, and masks the
//! API key that the provider requires in every request URL.

use regex::Regex;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl From<LogLevel> for tracing::level_filters::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::level_filters::LevelFilter::TRACE,
            LogLevel::Debug => tracing::level_filters::LevelFilter::DEBUG,
            LogLevel::Info => tracing::level_filters::LevelFilter::INFO,
            LogLevel::Warn => tracing::level_filters::LevelFilter::WARN,
            LogLevel::Error => tracing::level_filters::LevelFilter::ERROR,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable format.
    #[default]
    Pretty,
    /// JSON lines.
    Json,
    /// Compact single-line format.
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// Minimum log level.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
    /// Include the module target in log output.
    pub include_target: bool,
}

impl LoggingConfig {
    /// Creates a new logging configuration.
    pub fn new() -> Self {
        Self {
            include_target: true,
            ..Default::default()
        }
    }

    /// Sets the log level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets whether to include the module target.
    pub fn with_target(mut self, include: bool) -> Self {
        self.include_target = include;
        self
    }

    /// Installs a global `tracing` subscriber with this configuration.
    ///
    /// `RUST_LOG` directives are honored on top of the configured level.
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed.
    pub fn init(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let filter = EnvFilter::from_default_env().add_directive(
            tracing::level_filters::LevelFilter::from(self.level).into(),
        );

        match self.format {
            LogFormat::Pretty => tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(self.include_target))
                .try_init()?,
            LogFormat::Json => tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .try_init()?,
            LogFormat::Compact => tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_target(self.include_target))
                .try_init()?,
        }

        Ok(())
    }
}

fn credential_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)(api[_-]?key=)[^&\s]+").ok())
        .as_ref()
}

/// Masks `api_key=...` query values in URLs and error messages.
pub fn redact_credentials(text: &str) -> String {
    match credential_pattern() {
        Some(re) => re.replace_all(text, "${1}***").into_owned(),
        None => text.to_string(),
    }
}
