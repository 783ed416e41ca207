//! Structured logging settings.

use crate::config::LoggingSettings;
use tracing_subscriber::EnvFilter;

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name; unknown names fall back to `Pretty`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Event filter.
    pub filter: EnvFilter,
}

impl LoggingConfig {
    /// Default directive without `--verbose`.
    pub const DEFAULT_FILTER: &'static str = "csvmap=warn";

    /// Default directive with `--verbose`.
    pub const VERBOSE_FILTER: &'static str = "csvmap=debug";

    /// Builds the configuration from file settings.
    ///
    /// An explicit filter wins over `verbose`. Invalid directives fall
    /// back to the default filter.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let format = settings
            .and_then(|s| s.format.as_deref())
            .map(LogFormat::parse)
            .unwrap_or_default();

        let fallback = if verbose {
            Self::VERBOSE_FILTER
        } else {
            Self::DEFAULT_FILTER
        };
        let filter = settings
            .and_then(|s| s.filter.as_deref())
            .and_then(|directive| EnvFilter::try_new(directive).ok())
            .unwrap_or_else(|| EnvFilter::new(fallback));

        Self { format, filter }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("xml"), LogFormat::Pretty);
    }

    #[test]
    fn test_from_settings_defaults() {
        let config = LoggingConfig::from_settings(None, false);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.filter.to_string().to_lowercase(), LoggingConfig::DEFAULT_FILTER);

        let config = LoggingConfig::from_settings(None, true);
        assert_eq!(config.filter.to_string().to_lowercase(), LoggingConfig::VERBOSE_FILTER);
    }

    #[test]
    fn test_explicit_filter_wins() {
        let settings = LoggingSettings {
            format: Some("json".to_string()),
            filter: Some("csvmap=trace".to_string()),
        };
        let config = LoggingConfig::from_settings(Some(&settings), false);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter.to_string().to_lowercase(), "csvmap=trace");
    }
}
