//! Configuration builders for tests.

use quiver_config::AppConfig;

/// Fluent builder for [`AppConfig`] in tests.
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .worker_backend("inline")
///     .timeout_ms(50)
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn ranker(mut self, preset: &str) -> Self {
        self.config.selector.ranker = preset.to_string();
        self
    }

    pub fn weight(mut self, class: &str, rank: u32) -> Self {
        self.config.selector.weights.insert(class.to_string(), rank);
        self
    }

    pub fn worker_backend(mut self, backend: &str) -> Self {
        self.config.worker.backend = backend.to_string();
        self
    }

    pub fn max_concurrent(mut self, n: usize) -> Self {
        self.config.worker.max_concurrent = n;
        self
    }

    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.worker.timeout_ms = ms;
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
