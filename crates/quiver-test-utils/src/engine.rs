//! Engine test helpers.
//!
//! Build [`Engine`] instances with the standard catalog and sensible pool
//! defaults, optionally from a temporary config file.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use quiver_config::AppConfig;
use quiver_core::{Category, Engine, EngineBuilder, SharedStrategy, WorkerPool};
use quiver_core::worker::{InlineBackend, ThreadBackend};
use tempfile::TempDir;

use crate::fixtures::Values;

/// Thread-backed pool with `capacity` slots and the given timeout.
pub fn thread_pool(capacity: usize, timeout: Duration) -> WorkerPool {
    WorkerPool::new(Arc::new(ThreadBackend::new()), capacity).with_timeout(timeout)
}

/// Inline pool: worker dispatch runs on the caller, no timeout.
pub fn inline_pool(capacity: usize) -> WorkerPool {
    WorkerPool::new(Arc::new(InlineBackend), capacity)
}

/// Engine with the standard catalog for `i64` and a 4-slot thread pool.
pub fn standard_engine() -> Engine {
    standard_builder()
        .worker_pool(thread_pool(4, Duration::from_secs(5)))
        .build()
}

/// Builder pre-loaded with the standard catalog for `i64`.
pub fn standard_builder() -> EngineBuilder {
    let mut builder = EngineBuilder::new();
    quiver_algorithms::register_standard_catalog::<i64>(&mut builder)
        .expect("standard catalog registers cleanly");
    builder
}

/// Engine holding only `strategies` (sorting `Vec<i64>`) on `pool`.
pub fn engine_with(strategies: Vec<SharedStrategy<Values, Values>>, pool: WorkerPool) -> Engine {
    let mut builder = EngineBuilder::new().worker_pool(pool);
    for strategy in strategies {
        builder
            .register(Category::Sorting, strategy)
            .expect("fixture registers cleanly");
    }
    builder.build()
}

/// A test-scoped engine built from a config file in a temp directory.
///
/// The directory is removed when this value is dropped.
pub struct TestEngine {
    pub engine: Engine,
    pub config: AppConfig,
    pub config_path: PathBuf,
    _temp_dir: TempDir,
}

impl TestEngine {
    /// Write `toml_content` to a temp config file, load it, and build an
    /// engine with the standard catalog from it.
    pub async fn with_toml(toml_content: &str) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("quiver.toml");
        tokio::fs::write(&config_path, toml_content)
            .await
            .expect("failed to write test config");

        let config = AppConfig::load(&config_path)
            .await
            .expect("failed to parse test config");

        let mut builder = EngineBuilder::from_config(&config).expect("config builds an engine");
        quiver_algorithms::register_standard_catalog::<i64>(&mut builder)
            .expect("standard catalog registers cleanly");

        Self {
            engine: builder.build(),
            config,
            config_path,
            _temp_dir: temp_dir,
        }
    }

    /// Engine from an empty config file (all defaults).
    pub async fn default_config() -> Self {
        Self::with_toml("").await
    }
}
