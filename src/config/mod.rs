//! Configuration management.
//!
//! Configuration is read from a TOML file and then overridden by environment
//! variables:
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `LINKGRAPH_CONFIG_PATH` | config file location |
//! | `LINKGRAPH_STORE_PATH` | `store.path` (and selects the `sqlite` backend) |
//! | `LINKGRAPH_FIXTURE_PATH` | `parser.fixture_path` |
//! | `LINKGRAPH_DICTIONARY` | `parser.dictionary` |
//! | `LINKGRAPH_LOG_FORMAT` | `observability.logging.format` |
//! | `LINKGRAPH_METRICS_ENABLED` | `observability.metrics.enabled` |

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "LINKGRAPH_CONFIG_PATH";

const DEFAULT_DICTIONARY: &str = "en";
const STORE_FILE_NAME: &str = "atoms.sqlite";

/// Main configuration for linkgraph.
#[derive(Debug, Clone, Default)]
pub struct LinkgraphConfig {
    /// Atom store settings.
    pub store: StoreConfig,
    /// Parser settings.
    pub parser: ParserConfig,
    /// Logging and metrics settings.
    pub observability: ObservabilitySettings,
}

/// Atom store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// `SQLite` database file.
    #[default]
    Sqlite,
    /// Process-local memory; lost on exit.
    Memory,
}

impl StoreBackend {
    /// Parses a backend string. Unknown values select `SQLite`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" | "in_memory" => Self::Memory,
            _ => Self::Sqlite,
        }
    }

    /// Returns the backend name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }
}

/// Atom store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Backend kind.
    pub backend: StoreBackend,
    /// Database path for the `SQLite` backend.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            path: default_data_dir().join(STORE_FILE_NAME),
        }
    }
}

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Fixture file the offline parser replays.
    pub fixture_path: Option<PathBuf>,
    /// Dictionary language.
    pub dictionary: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            fixture_path: None,
            dictionary: DEFAULT_DICTIONARY.to_string(),
        }
    }
}

/// Observability section; also the on-disk shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObservabilitySettings {
    /// Logging settings.
    pub logging: Option<LoggingSettings>,
    /// Metrics settings.
    pub metrics: Option<MetricsSettings>,
}

/// Logging section in config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// `EnvFilter` directive, e.g. `linkgraph=debug`.
    pub filter: Option<String>,
    /// Log file path; stderr when unset.
    pub file: Option<String>,
}

/// Metrics section in config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsSettings {
    /// Whether the Prometheus recorder is installed.
    pub enabled: Option<bool>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Store section.
    pub store: Option<ConfigFileStore>,
    /// Parser section.
    pub parser: Option<ConfigFileParser>,
    /// Observability section.
    pub observability: Option<ObservabilitySettings>,
}

/// Store section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileStore {
    /// Backend name.
    pub backend: Option<String>,
    /// Database path.
    pub path: Option<String>,
}

/// Parser section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileParser {
    /// Fixture path.
    pub fixture_path: Option<String>,
    /// Dictionary language.
    pub dictionary: Option<String>,
}

impl LinkgraphConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration TOML.
    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        Self::from_toml(&contents)
    }

    /// Loads configuration from the default location.
    ///
    /// Uses `config.toml` in the platform config directory for `linkgraph`.
    /// Returns default configuration if no readable file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(dirs) = project_dirs() else {
            return Self::default();
        };

        let path = dirs.config_dir().join("config.toml");
        if path.exists() {
            match Self::load_from_file(&path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(error = %e, "Ignoring unreadable default config"),
            }
        }

        Self::default()
    }

    /// Applies `LINKGRAPH_*` environment overrides.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = lookup("LINKGRAPH_STORE_PATH") {
            self.store.backend = StoreBackend::Sqlite;
            self.store.path = PathBuf::from(path);
        }
        if let Some(path) = lookup("LINKGRAPH_FIXTURE_PATH") {
            self.parser.fixture_path = Some(PathBuf::from(path));
        }
        if let Some(dictionary) = lookup("LINKGRAPH_DICTIONARY") {
            self.parser.dictionary = dictionary;
        }
        if let Some(format) = lookup("LINKGRAPH_LOG_FORMAT") {
            self.observability
                .logging
                .get_or_insert_with(LoggingSettings::default)
                .format = Some(format);
        }
        if let Some(enabled) = lookup("LINKGRAPH_METRICS_ENABLED") {
            self.observability
                .metrics
                .get_or_insert_with(MetricsSettings::default)
                .enabled = Some(parse_bool(&enabled));
        }

        self
    }

    /// Converts a `ConfigFile` to `LinkgraphConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(store) = file.store {
            if let Some(backend) = store.backend {
                config.store.backend = StoreBackend::parse(&backend);
            }
            if let Some(path) = store.path {
                config.store.path = PathBuf::from(path);
            }
        }
        if let Some(parser) = file.parser {
            config.parser.fixture_path = parser.fixture_path.map(PathBuf::from);
            if let Some(dictionary) = parser.dictionary {
                config.parser.dictionary = dictionary;
            }
        }
        if let Some(observability) = file.observability {
            config.observability = observability;
        }

        config
    }

    /// Sets the store path and selects the `SQLite` backend.
    #[must_use]
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store.backend = StoreBackend::Sqlite;
        self.store.path = path.into();
        self
    }

    /// Sets the parser fixture path.
    #[must_use]
    pub fn with_fixture_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.parser.fixture_path = Some(path.into());
        self
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "linkgraph")
}

fn default_data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from(".linkgraph"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn parse_bool(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}
