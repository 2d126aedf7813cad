//! Fake strategies over `Vec<i64>` for exercising selection and execution.
//!
//! Each fake sorts correctly on its synchronous path unless its name says
//! otherwise, so fallback behaviour can be checked against real output.

use std::sync::Arc;
use std::time::Duration;

use quiver_core::{
    AlgoMetadata, ComplexityClass, SelectorHint, SharedStrategy, Strategy, StrategyError,
};

/// Element vector used by the fakes.
pub type Values = Vec<i64>;

/// Parallel-capable sort whose worker path sleeps before sorting.
///
/// Ranked ahead of the standard catalog (O(n) time) and applicable to any
/// input, so it wins selection whenever it is registered.
pub struct SlowParallelSort {
    meta: AlgoMetadata,
    delay: Duration,
}

impl SlowParallelSort {
    pub fn new(delay: Duration) -> Self {
        Self {
            meta: AlgoMetadata::new("slow_parallel_sort", ComplexityClass::Linear)
                .stable()
                .with_description("Test fake: sleeps on the worker path"),
            delay,
        }
    }

    pub fn shared(delay: Duration) -> SharedStrategy<Values, Values> {
        Arc::new(Self::new(delay))
    }
}

impl Strategy<Values, Values> for SlowParallelSort {
    fn metadata(&self) -> &AlgoMetadata {
        &self.meta
    }

    fn can_apply(&self, _input: &Values, _hint: &SelectorHint) -> Result<bool, StrategyError> {
        Ok(true)
    }

    fn execute(&self, mut input: Values) -> Result<Values, StrategyError> {
        input.sort();
        Ok(input)
    }

    fn parallel_capable(&self) -> bool {
        true
    }

    fn execute_parallel(&self, input: Values) -> Result<Values, StrategyError> {
        std::thread::sleep(self.delay);
        self.execute(input)
    }
}

/// Parallel-capable sort whose worker path always panics.
pub struct PanickingParallelSort {
    meta: AlgoMetadata,
}

impl PanickingParallelSort {
    pub fn shared() -> SharedStrategy<Values, Values> {
        Arc::new(Self {
            meta: AlgoMetadata::new("panicking_parallel_sort", ComplexityClass::Linear),
        })
    }
}

impl Strategy<Values, Values> for PanickingParallelSort {
    fn metadata(&self) -> &AlgoMetadata {
        &self.meta
    }

    fn can_apply(&self, _input: &Values, _hint: &SelectorHint) -> Result<bool, StrategyError> {
        Ok(true)
    }

    fn execute(&self, mut input: Values) -> Result<Values, StrategyError> {
        input.sort_unstable();
        Ok(input)
    }

    fn parallel_capable(&self) -> bool {
        true
    }

    fn execute_parallel(&self, _input: Values) -> Result<Values, StrategyError> {
        panic!("parallel path exploded")
    }
}

/// Sort whose every execution path fails.
pub struct FailingSort {
    meta: AlgoMetadata,
}

impl FailingSort {
    pub fn shared() -> SharedStrategy<Values, Values> {
        Arc::new(Self {
            meta: AlgoMetadata::new("failing_sort", ComplexityClass::Constant),
        })
    }
}

impl Strategy<Values, Values> for FailingSort {
    fn metadata(&self) -> &AlgoMetadata {
        &self.meta
    }

    fn can_apply(&self, _input: &Values, _hint: &SelectorHint) -> Result<bool, StrategyError> {
        Ok(true)
    }

    fn execute(&self, _input: Values) -> Result<Values, StrategyError> {
        Err(StrategyError::Failed("out of comparators".to_string()))
    }

    fn parallel_capable(&self) -> bool {
        true
    }
}

/// Sort whose predicate errors instead of answering.
pub struct FailingPredicate {
    meta: AlgoMetadata,
}

impl FailingPredicate {
    pub fn shared() -> SharedStrategy<Values, Values> {
        Arc::new(Self {
            meta: AlgoMetadata::new("failing_predicate", ComplexityClass::Linearithmic),
        })
    }
}

impl Strategy<Values, Values> for FailingPredicate {
    fn metadata(&self) -> &AlgoMetadata {
        &self.meta
    }

    fn can_apply(&self, _input: &Values, _hint: &SelectorHint) -> Result<bool, StrategyError> {
        Err(StrategyError::InvalidInput("cannot inspect input".to_string()))
    }

    fn execute(&self, mut input: Values) -> Result<Values, StrategyError> {
        input.sort();
        Ok(input)
    }
}
