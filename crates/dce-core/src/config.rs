//! Editor configuration: YAML file plus `DCE_*` environment overrides.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an optional YAML config file
pub const CONFIG_PATH_ENV: &str = "DCE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}

/// Top-level configuration for the editor service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub listen_addr: String,
    /// Root directory searched for `*.hbs` templates
    pub templates_dir: PathBuf,
    /// JSON file backing the persistence store; in-memory when absent
    pub store_path: Option<PathBuf>,
    /// YAML document offered to the editor on first load
    pub starter_contract: Option<PathBuf>,
    /// Re-read templates from disk on every render
    pub template_dev_mode: bool,
    pub worker: WorkerConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8787".to_string(),
            templates_dir: PathBuf::from("templates"),
            store_path: None,
            starter_contract: None,
            template_dev_mode: false,
            worker: WorkerConfig::default(),
        }
    }
}

/// Sizing for the background parse worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Capacity of the inbox and reply channels
    pub channel_capacity: usize,
    /// Parse jobs allowed to run at the same time
    pub max_in_flight: usize,
    pub parse_timeout_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            max_in_flight: 4,
            parse_timeout_ms: 5000,
        }
    }
}

impl EditorConfig {
    /// Load from `DCE_CONFIG` (if set) and apply process environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()
    }

    /// Apply `DCE_*` overrides looked up through `lookup`
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("DCE_ADDR") {
            self.listen_addr = addr;
        }
        if let Some(dir) = lookup("DCE_TEMPLATES_DIR") {
            self.templates_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("DCE_STORE_PATH") {
            self.store_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("DCE_STARTER_CONTRACT") {
            self.starter_contract = Some(PathBuf::from(path));
        }
        if let Some(raw) = lookup("DCE_TEMPLATE_DEV_MODE") {
            self.template_dev_mode = parse_value("DCE_TEMPLATE_DEV_MODE", &raw)?;
        }
        if let Some(raw) = lookup("DCE_WORKER_MAX_IN_FLIGHT") {
            self.worker.max_in_flight = parse_value("DCE_WORKER_MAX_IN_FLIGHT", &raw)?;
        }
        if let Some(raw) = lookup("DCE_PARSE_TIMEOUT_MS") {
            self.worker.parse_timeout_ms = parse_value("DCE_PARSE_TIMEOUT_MS", &raw)?;
        }
        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.worker.channel_capacity == 0 {
            return Err(invalid("worker.channel_capacity", "0"));
        }
        if self.worker.max_in_flight == 0 {
            return Err(invalid("worker.max_in_flight", "0"));
        }
        if self.worker.parse_timeout_ms == 0 {
            return Err(invalid("worker.parse_timeout_ms", "0"));
        }
        Ok(self)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| invalid(key, raw))
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
