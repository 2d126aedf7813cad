//! Direct execution by exact strategy name.
//!
//! The fast path for callers that already know which strategy they want:
//! no predicates, no ranking, no worker pool. An unknown name is an error;
//! it never falls back to full selection.

use std::time::Instant;

use crate::engine::{ExecutionMode, Success};
use crate::error::EngineError;
use crate::registry::{SharedStrategy, StrategyRegistry};
use crate::strategy::{Category, StrategySignature, guarded};

/// Runs a named strategy on the caller's thread.
pub struct DirectExecutor<'a> {
    registry: &'a StrategyRegistry,
}

impl<'a> DirectExecutor<'a> {
    pub fn new(registry: &'a StrategyRegistry) -> Self {
        Self { registry }
    }

    /// Look up `name` under the `(I, O, category)` signature and execute it.
    pub fn run<I: 'static, O: 'static>(
        &self,
        category: Category,
        name: &str,
        input: I,
    ) -> Result<Success<O>, EngineError> {
        let signature = StrategySignature::of::<I, O>(category);
        let strategy = self
            .registry
            .find_by_name::<I, O>(name, &signature)
            .ok_or_else(|| {
                EngineError::no_strategy(
                    signature,
                    format!("strategy '{name}' is not registered"),
                )
            })?;

        tracing::debug!(strategy = %name, signature = %signature, "Direct execution");
        let started = Instant::now();
        let output = run_sync(&strategy, input)?;
        Ok(Success::new(output, &strategy, started.elapsed(), ExecutionMode::Inline))
    }
}

/// Execute `strategy` on the calling thread, containing panics.
pub(crate) fn run_sync<I, O>(strategy: &SharedStrategy<I, O>, input: I) -> Result<O, EngineError> {
    guarded(|| strategy.execute(input)).map_err(|source| EngineError::Execution {
        strategy: strategy.name().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::complexity::ComplexityClass;
    use crate::hint::SelectorHint;
    use crate::metadata::AlgoMetadata;
    use crate::strategy::{Strategy, StrategyError};

    struct Halve {
        meta: AlgoMetadata,
    }

    impl Strategy<u32, u32> for Halve {
        fn metadata(&self) -> &AlgoMetadata {
            &self.meta
        }

        fn can_apply(&self, _input: &u32, _hint: &SelectorHint) -> Result<bool, StrategyError> {
            // Never applicable: direct execution must not consult it.
            Ok(false)
        }

        fn execute(&self, input: u32) -> Result<u32, StrategyError> {
            if input % 2 == 1 {
                return Err(StrategyError::InvalidInput(format!("{input} is odd")));
            }
            if input == 0 {
                panic!("zero");
            }
            Ok(input / 2)
        }
    }

    fn registry() -> StrategyRegistry {
        let mut registry = StrategyRegistry::new();
        let halve: SharedStrategy<u32, u32> = Arc::new(Halve {
            meta: AlgoMetadata::new("halve", ComplexityClass::Constant),
        });
        registry
            .register(StrategySignature::of::<u32, u32>(Category::Graph), halve)
            .unwrap();
        registry
    }

    #[test]
    fn test_runs_named_strategy_ignoring_predicate() {
        let registry = registry();
        let success = DirectExecutor::new(&registry)
            .run::<u32, u32>(Category::Graph, "halve", 8)
            .unwrap();
        assert_eq!(success.output, 4);
        assert_eq!(success.strategy_name, "halve");
        assert_eq!(success.mode, ExecutionMode::Inline);
    }

    #[test]
    fn test_unknown_name_is_no_strategy() {
        let registry = registry();
        let direct = DirectExecutor::new(&registry);
        let err = direct
            .run::<u32, u32>(Category::Graph, "double", 8)
            .unwrap_err();
        assert!(matches!(err, EngineError::NoStrategy { .. }));

        // Same name, other category: still a miss.
        let err = direct
            .run::<u32, u32>(Category::Sorting, "halve", 8)
            .unwrap_err();
        assert!(matches!(err, EngineError::NoStrategy { .. }));
    }

    #[test]
    fn test_failures_become_execution_errors() {
        let registry = registry();
        let direct = DirectExecutor::new(&registry);

        let err = direct.run::<u32, u32>(Category::Graph, "halve", 3).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Execution { source: StrategyError::InvalidInput(_), .. }
        ));

        let err = direct.run::<u32, u32>(Category::Graph, "halve", 0).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Execution { source: StrategyError::Panicked(_), .. }
        ));
    }
}
