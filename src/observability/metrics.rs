//! Prometheus metrics.
//!
//! The recorder is process-local; the CLI renders it in the Prometheus text
//! format when a command finishes.

use crate::config::MetricsSettings;
use crate::{Error, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Metrics configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,
}

impl MetricsConfig {
    /// Builds metrics configuration from config settings.
    #[must_use]
    pub fn from_settings(settings: Option<&MetricsSettings>) -> Self {
        Self {
            enabled: settings.and_then(|config| config.enabled).unwrap_or(false),
        }
    }
}

/// Handle to the installed recorder.
#[derive(Debug, Clone)]
pub struct MetricsHandle {
    prometheus: PrometheusHandle,
}

impl MetricsHandle {
    /// Renders all recorded metrics in the Prometheus text format.
    #[must_use]
    pub fn render(&self) -> String {
        self.prometheus.render()
    }
}

/// Installs the Prometheus recorder as the global `metrics` recorder.
///
/// Returns `None` when metrics are disabled.
///
/// # Errors
///
/// Returns an error if a global recorder is already installed.
pub fn install_prometheus(config: &MetricsConfig) -> Result<Option<MetricsHandle>> {
    if !config.enabled {
        return Ok(None);
    }

    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| Error::OperationFailed {
            operation: "metrics_recorder_install".to_string(),
            cause: e.to_string(),
        })?;

    Ok(Some(MetricsHandle { prometheus }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_installs_nothing() {
        let handle = install_prometheus(&MetricsConfig::default()).unwrap();
        assert!(handle.is_none());
    }

    #[test]
    fn test_from_settings() {
        let settings = MetricsSettings {
            enabled: Some(true),
        };
        assert!(MetricsConfig::from_settings(Some(&settings)).enabled);
        assert!(!MetricsConfig::from_settings(None).enabled);
    }
}
