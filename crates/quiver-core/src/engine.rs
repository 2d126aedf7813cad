//! The engine facade: select a strategy, run it, report what happened.
//!
//! An [`Engine`] is assembled once with an [`EngineBuilder`] (registration
//! needs `&mut` access), then frozen. After `build()` the registry is shared
//! read-only, so registration can never race with selection.
//!
//! Execution runs on the caller's thread unless the hint sets
//! `prefer_parallel` and the winner is parallel-capable. In that case the
//! winner's parallel path goes to the [`WorkerPool`]; any worker failure
//! (full pool, timeout, error, panic) is followed by exactly one
//! synchronous retry, and only that retry's failure reaches the caller.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use quiver_config::AppConfig;
use serde::Serialize;

use crate::complexity::{ComplexityClass, ComplexityRanker, RankerPreset};
use crate::direct::{DirectExecutor, run_sync};
use crate::error::EngineError;
use crate::hint::SelectorHint;
use crate::metadata::AlgoMetadata;
use crate::registry::{CatalogEntry, RegistryError, SharedStrategy, StrategyRegistry};
use crate::selector::{Rejection, Selector};
use crate::strategy::{Category, StrategySignature};
use crate::worker::{BackendPreference, PoolStats, WorkerPool, select_backend};

/// Where the output of a call was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    /// Synchronously on the caller's thread.
    Inline,
    /// On a worker from the pool.
    Worker,
    /// Synchronously, after the worker path failed.
    Fallback,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Inline => write!(f, "inline"),
            ExecutionMode::Worker => write!(f, "worker"),
            ExecutionMode::Fallback => write!(f, "fallback"),
        }
    }
}

/// Output of a successful call plus what produced it.
#[derive(Debug, Clone)]
pub struct Success<O> {
    pub output: O,
    pub strategy_name: String,
    pub metadata: AlgoMetadata,
    pub elapsed: Duration,
    pub mode: ExecutionMode,
}

impl<O> Success<O> {
    pub(crate) fn new<I>(
        output: O,
        strategy: &SharedStrategy<I, O>,
        elapsed: Duration,
        mode: ExecutionMode,
    ) -> Self {
        Self {
            output,
            strategy_name: strategy.name().to_string(),
            metadata: strategy.metadata().clone(),
            elapsed,
            mode,
        }
    }

    /// Wall-clock execution time in microseconds (selection excluded).
    pub fn execution_time_micros(&self) -> u64 {
        u64::try_from(self.elapsed.as_micros()).unwrap_or(u64::MAX)
    }
}

/// Result of [`Engine::sort`].
#[derive(Debug, Clone)]
pub struct SortSuccess<T> {
    pub output: Vec<T>,
    pub selected_strategy_name: String,
    pub selected_strategy_metadata: AlgoMetadata,
    pub execution_time_micros: u64,
    pub mode: ExecutionMode,
}

/// Result of [`Engine::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSuccess {
    pub found_index: Option<usize>,
    pub selected_strategy_name: String,
    pub execution_time_micros: u64,
    pub mode: ExecutionMode,
}

/// Input of the searching signature: find `target` in `haystack`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInput<T> {
    pub haystack: Vec<T>,
    pub target: T,
}

/// Why the engine would pick what it picks, for a given input and hint.
#[derive(Debug, Clone)]
pub struct Explanation {
    pub signature: String,
    pub forced: bool,
    /// Eligible candidates, best first.
    pub ranked: Vec<AlgoMetadata>,
    pub rejected: Vec<Rejection>,
}

impl Explanation {
    /// Name of the candidate that would run.
    pub fn winner(&self) -> Option<&str> {
        self.ranked.first().map(|m| m.name.as_str())
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.signature)?;
        if self.forced {
            writeln!(f, "  (forced)")?;
        }
        for (i, meta) in self.ranked.iter().enumerate() {
            write!(
                f,
                "  {}. {:<22} {} time, {} space",
                i + 1,
                meta.name,
                meta.time_complexity,
                meta.space_complexity
            )?;
            if meta.stable {
                write!(f, ", stable")?;
            }
            if meta.in_place {
                write!(f, ", in-place")?;
            }
            writeln!(f)?;
        }
        for rejection in &self.rejected {
            writeln!(f, "  -  {:<22} {}", rejection.name, rejection.reason)?;
        }
        Ok(())
    }
}

// ── Builder ─────────────────────────────────────────────────────────────

/// Assembles an [`Engine`].
pub struct EngineBuilder {
    registry: StrategyRegistry,
    ranker: ComplexityRanker,
    pool: Option<WorkerPool>,
}

impl EngineBuilder {
    /// Default worker-pool capacity when none is configured.
    pub const DEFAULT_CAPACITY: usize = 4;

    /// An empty builder with the standard ranker and an auto-detected pool.
    pub fn new() -> Self {
        Self {
            registry: StrategyRegistry::new(),
            ranker: ComplexityRanker::default(),
            pool: None,
        }
    }

    /// A builder whose ranker and worker pool come from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, EngineError> {
        let preset: RankerPreset = config
            .selector
            .ranker
            .parse()
            .map_err(EngineError::Configuration)?;

        let mut ranker = ComplexityRanker::new(preset);
        for (key, rank) in &config.selector.weights {
            let class: ComplexityClass = key.parse().map_err(|_| {
                EngineError::Configuration(format!(
                    "selector.weights: unknown complexity class '{key}'"
                ))
            })?;
            ranker = ranker.with_weight(class, *rank);
        }

        let pool = WorkerPool::from_config(&config.worker)?;
        Ok(Self::new().ranker(ranker).worker_pool(pool))
    }

    /// Builder: replace the ranker.
    pub fn ranker(mut self, ranker: ComplexityRanker) -> Self {
        self.ranker = ranker;
        self
    }

    /// Builder: replace the worker pool.
    pub fn worker_pool(mut self, pool: WorkerPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Register a strategy under the `(I, O, category)` signature.
    pub fn register<I: 'static, O: 'static>(
        &mut self,
        category: Category,
        strategy: SharedStrategy<I, O>,
    ) -> Result<&mut Self, RegistryError> {
        self.registry
            .register(StrategySignature::of::<I, O>(category), strategy)?;
        Ok(self)
    }

    /// Strategies registered so far.
    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Freeze the registry and produce the engine.
    pub fn build(self) -> Engine {
        let pool = self.pool.unwrap_or_else(|| {
            WorkerPool::new(
                select_backend(&BackendPreference::Auto),
                Self::DEFAULT_CAPACITY,
            )
        });
        tracing::info!(
            strategies = self.registry.len(),
            ranker = %self.ranker.preset(),
            backend = pool.backend().name(),
            capacity = pool.capacity(),
            "Engine ready"
        );
        Engine {
            selector: Selector::new(Arc::new(self.registry), self.ranker),
            pool: Arc::new(pool),
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ── Engine ──────────────────────────────────────────────────────────────

/// Selection and execution over a frozen registry. Cheap to clone.
#[derive(Clone)]
pub struct Engine {
    selector: Selector,
    pool: Arc<WorkerPool>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn registry(&self) -> &StrategyRegistry {
        self.selector.registry()
    }

    pub fn ranker(&self) -> &ComplexityRanker {
        self.selector.ranker()
    }

    /// Every registered strategy, in registration order.
    pub fn catalog(&self) -> &[CatalogEntry] {
        self.registry().catalog()
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Pick the strategy that [`execute`](Engine::execute) would run.
    pub fn select<I: 'static, O: 'static>(
        &self,
        category: Category,
        input: &I,
        hint: &SelectorHint,
    ) -> Result<SharedStrategy<I, O>, EngineError> {
        let signature = StrategySignature::of::<I, O>(category);
        self.selector.select(&signature, input, hint)
    }

    /// Rank every candidate without running anything.
    pub fn explain<I: 'static, O: 'static>(
        &self,
        category: Category,
        input: &I,
        hint: &SelectorHint,
    ) -> Result<Explanation, EngineError> {
        let signature = StrategySignature::of::<I, O>(category);
        let evaluation = self.selector.evaluate::<I, O>(&signature, input, hint)?;
        Ok(Explanation {
            signature: signature.to_string(),
            forced: evaluation.forced,
            ranked: evaluation
                .ranked
                .iter()
                .map(|s| s.metadata().clone())
                .collect(),
            rejected: evaluation.rejected,
        })
    }

    /// Select the best strategy for `input` and run it.
    ///
    /// `hint` is used as given; [`sort`](Engine::sort) and
    /// [`search`](Engine::search) fill in `size` from the input first.
    pub async fn execute<I, O>(
        &self,
        category: Category,
        input: I,
        hint: &SelectorHint,
    ) -> Result<Success<O>, EngineError>
    where
        I: Clone + Send + 'static,
        O: Send + 'static,
    {
        let strategy = self.select::<I, O>(category, &input, hint)?;
        let started = Instant::now();

        if !(SelectorHint::is(hint.prefer_parallel) && strategy.parallel_capable()) {
            let output = run_sync(&strategy, input)?;
            return Ok(Success::new(output, &strategy, started.elapsed(), ExecutionMode::Inline));
        }

        // The worker gets its own copy; `input` stays here for the fallback.
        match self.pool.dispatch(Arc::clone(&strategy), input.clone()).await {
            Ok(output) => Ok(Success::new(
                output,
                &strategy,
                started.elapsed(),
                ExecutionMode::Worker,
            )),
            Err(e) => {
                tracing::warn!(
                    strategy = %strategy.name(),
                    error = %e,
                    "Worker path failed, retrying synchronously"
                );
                let output = run_sync(&strategy, input)?;
                Ok(Success::new(
                    output,
                    &strategy,
                    started.elapsed(),
                    ExecutionMode::Fallback,
                ))
            }
        }
    }

    /// Run a strategy by exact name, bypassing selection and the pool.
    pub fn run<I: 'static, O: 'static>(
        &self,
        category: Category,
        name: &str,
        input: I,
    ) -> Result<Success<O>, EngineError> {
        DirectExecutor::new(self.registry()).run(category, name, input)
    }

    /// Sort `input` with the best registered `Vec<T> -> Vec<T>` strategy.
    pub async fn sort<T>(
        &self,
        input: Vec<T>,
        hint: &SelectorHint,
    ) -> Result<SortSuccess<T>, EngineError>
    where
        T: Clone + Send + 'static,
    {
        let hint = hint.or_size(input.len() as u64);
        let success = self
            .execute::<Vec<T>, Vec<T>>(Category::Sorting, input, &hint)
            .await?;
        Ok(SortSuccess {
            execution_time_micros: success.execution_time_micros(),
            output: success.output,
            selected_strategy_name: success.strategy_name,
            selected_strategy_metadata: success.metadata,
            mode: success.mode,
        })
    }

    /// Find `target` in `input` with the best registered searching strategy.
    pub async fn search<T>(
        &self,
        input: Vec<T>,
        target: T,
        hint: &SelectorHint,
    ) -> Result<SearchSuccess, EngineError>
    where
        T: Clone + Send + 'static,
    {
        let hint = hint.or_size(input.len() as u64);
        let query = SearchInput {
            haystack: input,
            target,
        };
        let success = self
            .execute::<SearchInput<T>, Option<usize>>(Category::Searching, query, &hint)
            .await?;
        Ok(SearchSuccess {
            execution_time_micros: success.execution_time_micros(),
            found_index: success.output,
            selected_strategy_name: success.strategy_name,
            mode: success.mode,
        })
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("strategies", &self.registry().len())
            .field("ranker", &self.ranker().preset())
            .field("pool", &self.pool)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::InlineBackend;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_config_applies_ranker_and_pool() {
        let config = AppConfig::parse(
            r#"
[selector]
ranker = "favor-simple"
[selector.weights]
"O(n^2)" = 1

[worker]
backend = "inline"
max_concurrent = 2
timeout_ms = 100
"#,
        )
        .unwrap();

        let engine = EngineBuilder::from_config(&config).unwrap().build();
        assert_eq!(engine.ranker().preset(), RankerPreset::FavorSimple);
        assert_eq!(engine.ranker().rank(ComplexityClass::Quadratic), 1);
        let stats = engine.pool_stats();
        assert_eq!(stats.capacity, 2);
        assert_eq!(stats.dispatched, 0);
    }

    #[test]
    fn test_from_config_rejects_unknown_weight_key() {
        let mut config = AppConfig::default();
        config.selector.weights.insert("O(n^4)".to_string(), 3);
        let err = EngineBuilder::from_config(&config).err().unwrap();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("O(n^4)"));
    }

    #[test]
    fn test_empty_engine_has_no_strategy() {
        let engine = EngineBuilder::new()
            .worker_pool(WorkerPool::new(Arc::new(InlineBackend), 1))
            .build();
        assert!(engine.catalog().is_empty());
        let err = engine
            .select::<Vec<u8>, Vec<u8>>(Category::Sorting, &vec![1], &SelectorHint::new())
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::NoStrategy { .. }));
    }

    #[test]
    fn test_execution_time_micros_saturates() {
        let success = Success {
            output: (),
            strategy_name: "x".to_string(),
            metadata: AlgoMetadata::new("x", ComplexityClass::Constant),
            elapsed: Duration::from_millis(3),
            mode: ExecutionMode::Inline,
        };
        assert_eq!(success.execution_time_micros(), 3_000);
        assert_eq!(ExecutionMode::Fallback.to_string(), "fallback");
    }
}
