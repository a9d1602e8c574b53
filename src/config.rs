//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api::ApiConfig;
use crate::pane::{PaneConfig, SessionConfig};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub pane: PaneConfig,

    #[serde(default)]
    pub sessions: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Directive used when `RUST_LOG` is unset
    pub fn filter_directive(&self) -> String {
        format!("tabula={},tower_http={}", self.level, self.level)
    }

    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` wins over the configured level. Format is `json` or `pretty`.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.filter_directive()));

        let registry = tracing_subscriber::registry().with(filter);

        if self.format.eq_ignore_ascii_case("json") {
            registry.with(tracing_subscriber::fmt::layer().json()).init();
        } else {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from `TABULA_CONFIG`, the default locations, or the environment.
    ///
    /// Nothing is logged here; the subscriber usually depends on the result.
    /// Call [`ConfigDiscovery::log`] once tracing is installed.
    pub fn discover() -> ConfigDiscovery {
        let explicit = std::env::var("TABULA_CONFIG").ok().map(PathBuf::from);
        Self::discover_from(explicit.as_deref(), &default_config_paths())
    }

    /// Try `explicit` first, then each existing file in `search`
    pub fn discover_from(explicit: Option<&Path>, search: &[PathBuf]) -> ConfigDiscovery {
        let mut errors = Vec::new();

        let candidates = explicit
            .map(Path::to_path_buf)
            .into_iter()
            .chain(search.iter().filter(|p| p.exists()).cloned());

        for path in candidates {
            match Self::load_with_env(&path) {
                Ok(config) => {
                    return ConfigDiscovery {
                        config,
                        source: Some(path),
                        errors,
                    };
                }
                Err(e) => errors.push(e),
            }
        }

        ConfigDiscovery {
            config: Self::from_env(),
            source: None,
            errors,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("TABULA_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = env_parse("TABULA_API_PORT") {
            self.api.port = port;
        }
        if let Some(rows) = env_parse("TABULA_PREVIEW_ROWS") {
            self.pane.preview_rows = rows;
        }
        if let Some(max) = env_parse("TABULA_MAX_SESSIONS") {
            self.sessions.max_sessions = max;
        }
        if let Ok(level) = std::env::var("TABULA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("TABULA_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("tabula").join("config.toml"));
    }
    paths.push(PathBuf::from("/etc/tabula/config.toml"));
    paths.push(PathBuf::from("./config.toml"));
    paths
}

/// Outcome of [`Config::discover`]
#[derive(Debug)]
pub struct ConfigDiscovery {
    pub config: Config,
    /// File the config came from; `None` means defaults plus environment
    pub source: Option<PathBuf>,
    /// Files that were tried and rejected, in order
    pub errors: Vec<ConfigError>,
}

impl ConfigDiscovery {
    /// Report where the config came from and every file that failed to load
    pub fn log(&self) {
        for error in &self.errors {
            tracing::warn!("{}", error);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Tabula Configuration
#
# Environment variables override these settings:
# - TABULA_API_HOST
# - TABULA_API_PORT
# - TABULA_PREVIEW_ROWS
# - TABULA_MAX_SESSIONS
# - TABULA_LOG_LEVEL
# - TABULA_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8501

# Largest accepted upload (bytes)
max_upload_bytes = 209715200

[pane]
# Rows shown in the head preview
preview_rows = 10

[sessions]
# Maximum number of live sessions
max_sessions = 1000

# Idle sessions are dropped after this many seconds
idle_timeout_secs = 3600

# How often idle sessions are checked (seconds)
reap_interval_secs = 60

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.port, 8501);
        assert_eq!(config.pane.preview_rows, 10);
        assert_eq!(config.sessions.max_sessions, 1000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.api.max_upload_bytes, 200 * 1024 * 1024);
        assert_eq!(config.sessions.idle_timeout_secs, 3600);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pane]\npreview_rows = 5\n\n[api]\nport = 9000").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.pane.preview_rows, 5);
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load(Path::new("/nonexistent/tabula.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nport = ").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_discover_reports_malformed_file() {
        let mut broken = tempfile::NamedTempFile::new().unwrap();
        writeln!(broken, "[pane\npreview_rows = ").unwrap();

        let discovery = Config::discover_from(Some(broken.path()), &[]);

        assert!(discovery.source.is_none());
        assert_eq!(discovery.errors.len(), 1);
        assert!(matches!(
            &discovery.errors[0],
            ConfigError::Parse { path, .. } if path == broken.path()
        ));
        assert_eq!(discovery.config.pane.preview_rows, 10);
    }

    #[test]
    fn test_discover_falls_through_to_search_path() {
        let mut broken = tempfile::NamedTempFile::new().unwrap();
        writeln!(broken, "not toml at all [").unwrap();
        let mut good = tempfile::NamedTempFile::new().unwrap();
        writeln!(good, "[pane]\npreview_rows = 3").unwrap();

        let search = vec![
            PathBuf::from("/nonexistent/tabula/config.toml"),
            good.path().to_path_buf(),
        ];
        let discovery = Config::discover_from(Some(broken.path()), &search);

        assert_eq!(discovery.source.as_deref(), Some(good.path()));
        assert_eq!(discovery.errors.len(), 1);
        assert_eq!(discovery.config.pane.preview_rows, 3);
    }

    #[test]
    fn test_filter_directive() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "json".to_string(),
        };
        assert_eq!(logging.filter_directive(), "tabula=debug,tower_http=debug");
    }
}
