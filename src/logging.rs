//! Logging setup utilities.
//!
//! rowguard logs through `tracing`: run lifecycle at `info`, per-check
//! outcomes at `debug`/`warn`. Embedding applications usually install
//! their own subscriber; [`init_logging`] is a convenience for binaries
//! and tests that want structured output without wiring one up.

use tracing::Level;

/// Configuration for rowguard's logging setup.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the application.
    pub level: Level,
    /// Log level for rowguard components specifically.
    pub guard_level: Level,
    /// Whether to use JSON output format.
    pub json_format: bool,
    /// Environment filter override; takes precedence over the levels.
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            guard_level: Level::DEBUG,
            json_format: false,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Creates a configuration for production use.
    pub fn production() -> Self {
        Self {
            level: Level::WARN,
            guard_level: Level::INFO,
            json_format: true,
            env_filter: None,
        }
    }

    /// Creates a configuration for development use.
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            guard_level: Level::DEBUG,
            json_format: false,
            env_filter: None,
        }
    }

    /// Sets the log level for the application.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the log level for rowguard components.
    pub fn with_guard_level(mut self, level: Level) -> Self {
        self.guard_level = level;
        self
    }

    /// Sets whether to use JSON output format.
    pub fn with_json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    /// Sets a custom environment filter.
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Builds the environment filter string.
    pub fn env_filter(&self) -> String {
        if let Some(ref filter) = self.env_filter {
            filter.clone()
        } else {
            format!(
                "{},rowguard={}",
                self.level.as_str().to_lowercase(),
                self.guard_level.as_str().to_lowercase()
            )
        }
    }
}

/// Initializes a global `tracing` subscriber from the configuration.
///
/// `RUST_LOG` takes precedence over the configured levels when set.
///
/// # Examples
///
/// ```rust,no_run
/// use rowguard::logging::{init_logging, LoggingConfig};
///
/// init_logging(LoggingConfig::development()).unwrap();
/// ```
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

    let fmt_layer = if config.json_format {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_string() {
        let config = LoggingConfig::default();
        assert_eq!(config.env_filter(), "info,rowguard=debug");
    }

    #[test]
    fn test_explicit_filter_wins() {
        let config = LoggingConfig::default().with_env_filter("warn,rowguard=trace");
        assert_eq!(config.env_filter(), "warn,rowguard=trace");
    }

    #[test]
    fn test_production_profile() {
        let config = LoggingConfig::production();
        assert_eq!(config.level, Level::WARN);
        assert!(config.json_format);
        assert_eq!(config.env_filter(), "warn,rowguard=info");
    }
}
