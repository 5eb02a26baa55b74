//! Config CLI command.

use super::write_error;
use crate::Result;
use crate::config::LinkgraphConfig;
use std::io::Write;

/// Config command handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigCommand {
    show: bool,
}

impl ConfigCommand {
    /// Creates a config command.
    #[must_use]
    pub const fn new(show: bool) -> Self {
        Self { show }
    }

    /// Writes the effective configuration, or usage when `--show` is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn run(&self, config: &LinkgraphConfig, out: &mut impl Write) -> Result<()> {
        if !self.show {
            return writeln!(out, "Use --show to display configuration").map_err(write_error);
        }

        let logging = config.observability.logging.clone().unwrap_or_default();
        let metrics_enabled = config
            .observability
            .metrics
            .as_ref()
            .and_then(|m| m.enabled)
            .unwrap_or(false);

        let lines = [
            "Current Configuration".to_string(),
            "=====================".to_string(),
            String::new(),
            "Store:".to_string(),
            format!("  Backend: {}", config.store.backend.as_str()),
            format!("  Path: {}", config.store.path.display()),
            String::new(),
            "Parser:".to_string(),
            format!(
                "  Fixture: {}",
                config
                    .parser
                    .fixture_path
                    .as_ref()
                    .map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
            ),
            format!("  Dictionary: {}", config.parser.dictionary),
            String::new(),
            "Observability:".to_string(),
            format!(
                "  Log Format: {}",
                logging.format.as_deref().unwrap_or("(default)")
            ),
            format!(
                "  Log Filter: {}",
                logging.filter.as_deref().unwrap_or("(default)")
            ),
            format!("  Log File: {}", logging.file.as_deref().unwrap_or("(stderr)")),
            format!("  Metrics: {metrics_enabled}"),
        ];
        for line in lines {
            writeln!(out, "{line}").map_err(write_error)?;
        }

        Ok(())
    }
}
