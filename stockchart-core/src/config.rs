//! Serializable chart configuration.
//!
//! Loaded from TOML, then overridden from the environment. Every field has a
//! default so an empty file (or no file at all) yields a usable config.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
/// Period requested when the page has no period selector.
pub const DEFAULT_PERIOD: &str = "1y";
/// Id of the element the chart is drawn into.
pub const DEFAULT_CONTAINER_ID: &str = "stockChartContainer";
/// Id of the period selector control.
pub const DEFAULT_PERIOD_SELECT_ID: &str = "periodSelect";

pub const ENV_API_BASE_URL: &str = "STOCKCHART_API_BASE_URL";
pub const ENV_LOG_LEVEL: &str = "STOCKCHART_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "STOCKCHART_LOG_FILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the chart updater and its hosts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    /// Base of the price API, e.g. `http://localhost:8000/api`.
    pub api_base_url: String,

    /// Period used when the page has no period selector.
    pub default_period: String,

    /// Upper bound on a single fetch. `0` disables the timeout.
    pub request_timeout_secs: u64,

    /// Id of the chart container element.
    pub container_id: String,

    /// Id of the period selector element.
    pub period_select_id: String,

    pub log: LogConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            default_period: DEFAULT_PERIOD.to_string(),
            request_timeout_secs: 30,
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            period_select_id: DEFAULT_PERIOD_SELECT_ID.to_string(),
            log: LogConfig::default(),
        }
    }
}

/// Logging section (`[log]`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Level directive, e.g. `info` or `stockchart_core=debug`.
    pub level: String,

    /// Append log lines to this file as well.
    pub file: Option<PathBuf>,

    /// Emit JSON lines instead of human-readable text.
    pub json: bool,

    /// Write to stderr. Terminal UIs turn this off.
    pub console: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            json: false,
            console: true,
        }
    }
}

impl ChartConfig {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load from `path` when given, otherwise start from defaults; then apply
    /// environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (normally `std::env::var`).
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            self.log.level = level.trim().to_string();
        }
        if let Some(file) = lookup(ENV_LOG_FILE).filter(|v| !v.trim().is_empty()) {
            self.log.file = Some(PathBuf::from(file.trim()));
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.api_base_url).map_err(|e| {
            ConfigError::Invalid(format!("api_base_url '{}': {e}", self.api_base_url))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Invalid(format!(
                "api_base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.default_period.trim().is_empty() {
            return Err(ConfigError::Invalid("default_period is empty".into()));
        }
        if self.container_id.trim().is_empty() {
            return Err(ConfigError::Invalid("container_id is empty".into()));
        }
        if self.period_select_id.trim().is_empty() {
            return Err(ConfigError::Invalid("period_select_id is empty".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ChartConfig::from_toml("").unwrap();
        assert_eq!(config, ChartConfig::default());
        assert_eq!(config.default_period, "1y");
        assert_eq!(config.container_id, "stockChartContainer");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = ChartConfig::from_toml(
            r#"
api_base_url = "https://example.test/api"
request_timeout_secs = 0

[log]
level = "debug"
json = true
"#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://example.test/api");
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.log.level, "debug");
        assert!(config.log.json);
        assert!(config.log.console);
        assert_eq!(config.period_select_id, "periodSelect");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = ChartConfig::from_toml(r#"api_base_url = "ftp://example.test""#).unwrap_err();
        assert!(err.to_string().contains("http or https"), "{err}");
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let err = ChartConfig::from_toml(r#"api_base_url = "not a url""#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_empty_period() {
        let err = ChartConfig::from_toml(r#"default_period = "  ""#).unwrap_err();
        assert!(err.to_string().contains("default_period"));
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_BASE_URL, " http://10.0.0.5:9000/api "),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_FILE, "logs/app.log"),
        ]
        .into_iter()
        .collect();

        let config = ChartConfig::default()
            .with_env_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "http://10.0.0.5:9000/api");
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.log.file, Some(PathBuf::from("logs/app.log")));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let config = ChartConfig::default().with_env_overrides(|_| Some("   ".to_string()));
        assert_eq!(config, ChartConfig::default());
    }

    #[test]
    fn from_file_reports_path_on_io_error() {
        let err = ChartConfig::from_file(Path::new("/nonexistent/stockchart.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/stockchart.toml"));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockchart.toml");
        std::fs::write(&path, "default_period = \"5y\"\n").unwrap();
        let config = ChartConfig::from_file(&path).unwrap();
        assert_eq!(config.default_period, "5y");
    }
}
