//! Structured logging.

use crate::config::LoggingSettings;
use std::path::PathBuf;

const DEFAULT_FILTER: &str = "linkgraph=warn";
const VERBOSE_FILTER: &str = "linkgraph=debug";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format string. Unknown values select `Pretty`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive.
    pub filter: String,
    /// Log file; stderr when `None`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: DEFAULT_FILTER.to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Builds logging configuration from config settings.
    ///
    /// `RUST_LOG` wins over the configured filter; `verbose` raises the
    /// default filter to debug.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        Self::from_settings_with(settings, verbose, std::env::var("RUST_LOG").ok())
    }

    fn from_settings_with(
        settings: Option<&LoggingSettings>,
        verbose: bool,
        rust_log: Option<String>,
    ) -> Self {
        let format = settings
            .and_then(|s| s.format.as_deref())
            .map_or(LogFormat::Pretty, LogFormat::parse);
        let configured = settings.and_then(|s| s.filter.clone());
        let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
        let filter = rust_log
            .filter(|v| !v.trim().is_empty())
            .or(configured)
            .unwrap_or_else(|| fallback.to_string());
        let file = settings
            .and_then(|s| s.file.as_deref())
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(PathBuf::from);

        Self {
            format,
            filter,
            file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_settings() {
        let config = LoggingConfig::from_settings_with(None, false, None);
        assert_eq!(config, LoggingConfig::default());
    }

    #[test]
    fn test_verbose_raises_default() {
        let config = LoggingConfig::from_settings_with(None, true, None);
        assert_eq!(config.filter, VERBOSE_FILTER);
    }

    #[test]
    fn test_rust_log_wins() {
        let settings = LoggingSettings {
            format: Some("JSON".to_string()),
            filter: Some("linkgraph=info".to_string()),
            file: Some(" /tmp/linkgraph.log ".to_string()),
        };
        let config =
            LoggingConfig::from_settings_with(Some(&settings), false, Some("trace".to_string()));

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter, "trace");
        assert_eq!(config.file, Some(PathBuf::from("/tmp/linkgraph.log")));
    }

    #[test]
    fn test_configured_filter_used() {
        let settings = LoggingSettings {
            filter: Some("linkgraph=info".to_string()),
            ..LoggingSettings::default()
        };
        let config = LoggingConfig::from_settings_with(Some(&settings), true, None);
        assert_eq!(config.filter, "linkgraph=info");
    }
}
