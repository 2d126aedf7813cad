#![deny(unsafe_code)]

//! Configuration loading and validation for quiver.
//!
//! Loads TOML configuration files and validates them against the values the
//! engine understands. [`AppConfig`] is the central configuration structure;
//! `quiver-core` turns it into a ranker, a worker backend and a bounded pool.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Ranker presets accepted in `selector.ranker`.
pub const RANKER_PRESETS: [&str; 3] = ["standard", "favor-scalable", "favor-simple"];

/// Worker backends accepted in `worker.backend`.
pub const WORKER_BACKENDS: [&str; 3] = ["auto", "thread", "inline"];

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Strategy selection configuration.
    #[serde(default)]
    pub selector: SelectorConfig,

    /// Worker pool configuration.
    #[serde(default)]
    pub worker: WorkerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Strategy selection configuration.
///
/// ## TOML Example
///
/// ```toml
/// [selector]
/// ranker = "favor-simple"
///
/// [selector.weights]
/// "O(n)" = 1
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Complexity ranker preset: "standard", "favor-scalable", or "favor-simple".
    #[serde(default = "default_ranker")]
    pub ranker: String,

    /// Per-class rank overrides applied on top of the preset, keyed by the
    /// big-O spelling of the class (e.g. `"O(n log n)"`). Lower ranks win.
    #[serde(default)]
    pub weights: BTreeMap<String, u32>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            ranker: default_ranker(),
            weights: BTreeMap::new(),
        }
    }
}

fn default_ranker() -> String {
    "standard".to_string()
}

/// Worker pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Worker backend: "auto", "thread", or "inline".
    #[serde(default = "default_worker_backend")]
    pub backend: String,

    /// Maximum number of concurrently running workers.
    #[serde(default = "default_worker_max_concurrent")]
    pub max_concurrent: usize,

    /// Wall-clock bound for a dispatched task, in milliseconds.
    #[serde(default = "default_worker_timeout_ms")]
    pub timeout_ms: u64,
}

impl WorkerConfig {
    /// The configured timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            backend: default_worker_backend(),
            max_concurrent: default_worker_max_concurrent(),
            timeout_ms: default_worker_timeout_ms(),
        }
    }
}

fn default_worker_backend() -> String {
    "auto".to_string()
}

fn default_worker_max_concurrent() -> usize {
    4
}

fn default_worker_timeout_ms() -> u64 {
    5_000
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !RANKER_PRESETS.contains(&self.selector.ranker.as_str()) {
            return Err(ConfigError::Validation(format!(
                "selector.ranker must be one of {:?}, got {:?}",
                RANKER_PRESETS, self.selector.ranker
            )));
        }
        for key in self.selector.weights.keys() {
            if key.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "selector.weights keys must not be empty".to_string(),
                ));
            }
        }

        if !WORKER_BACKENDS.contains(&self.worker.backend.as_str()) {
            return Err(ConfigError::Validation(format!(
                "worker.backend must be one of {:?}, got {:?}",
                WORKER_BACKENDS, self.worker.backend
            )));
        }
        if self.worker.max_concurrent == 0 {
            return Err(ConfigError::Validation(
                "worker.max_concurrent must be at least 1".to_string(),
            ));
        }
        if self.worker.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "worker.timeout_ms must be non-zero".to_string(),
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging.level must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.selector.ranker, "standard");
        assert!(config.selector.weights.is_empty());
        assert_eq!(config.worker.backend, "auto");
        assert_eq!(config.worker.max_concurrent, 4);
        assert_eq!(config.worker.timeout(), Duration::from_secs(5));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.worker.max_concurrent, 4);
        assert_eq!(config.selector.ranker, "standard");
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
            [selector]
            ranker = "favor-simple"

            [selector.weights]
            "O(n)" = 1
            "O(n log n)" = 2

            [worker]
            backend = "thread"
            max_concurrent = 8
            timeout_ms = 250

            [logging]
            level = "debug"
        "#;
        let config = AppConfig::parse(toml).unwrap();
        assert_eq!(config.selector.ranker, "favor-simple");
        assert_eq!(config.selector.weights.get("O(n)"), Some(&1));
        assert_eq!(config.selector.weights.get("O(n log n)"), Some(&2));
        assert_eq!(config.worker.backend, "thread");
        assert_eq!(config.worker.max_concurrent, 8);
        assert_eq!(config.worker.timeout(), Duration::from_millis(250));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_validation_rejects_unknown_ranker() {
        let toml = r#"
            [selector]
            ranker = "fastest"
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_empty_weight_key() {
        let toml = r#"
            [selector.weights]
            "" = 3
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_unknown_backend() {
        let toml = r#"
            [worker]
            backend = "gpu"
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_zero_capacity() {
        let toml = r#"
            [worker]
            max_concurrent = 0
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let toml = r#"
            [worker]
            timeout_ms = 0
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_validation_rejects_empty_log_level() {
        let toml = r#"
            [logging]
            level = " "
        "#;
        assert!(AppConfig::parse(toml).is_err());
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let mut config = AppConfig::default();
        config.worker.backend = "inline".to_string();
        config.selector.weights.insert("O(n²)".to_string(), 9);

        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed = AppConfig::parse(&rendered).unwrap();
        assert_eq!(parsed.worker.backend, "inline");
        assert_eq!(parsed.selector.weights.get("O(n²)"), Some(&9));
    }

    // ── Async file-based loading ──────────────────────────────────────

    #[tokio::test]
    async fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("quiver.toml");
        tokio::fs::write(&path, b"[worker]\nmax_concurrent = 2\ntimeout_ms = 100\n")
            .await
            .unwrap();

        let config = AppConfig::load(&path).await.unwrap();
        assert_eq!(config.worker.max_concurrent, 2);
        assert_eq!(config.worker.timeout_ms, 100);
    }

    #[tokio::test]
    async fn test_load_nonexistent_file() {
        let result = AppConfig::load(Path::new("/nonexistent/quiver.toml")).await;
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_invalid_toml_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        tokio::fs::write(&path, b"not valid toml [[[").await.unwrap();

        let result = AppConfig::load(&path).await;
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("bad value".to_string());
        assert_eq!(err.to_string(), "validation error: bad value");
    }
}
