//! Caller-supplied selection hints.
//!
//! A [`SelectorHint`] is pure data: it describes the input's shape and the
//! caller's constraints, and is read by strategy predicates and by the
//! selector's ranking step. Every field is optional; `None` means "no
//! opinion".

use crate::complexity::ComplexityClass;
use crate::error::EngineError;

/// Declarative hints about an input and the caller's constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorHint {
    /// Number of elements in the input.
    pub size: Option<u64>,
    /// The input is already sorted.
    pub sorted: Option<bool>,
    /// The input is mostly sorted (few inversions).
    pub nearly_sorted: Option<bool>,
    /// Prefer strategies that keep equal elements in order.
    pub prefer_stable: Option<bool>,
    /// Prefer strategies that work in the input's own storage.
    pub prefer_in_place: Option<bool>,
    /// Upper bound on auxiliary memory, in bytes.
    pub memory_budget_bytes: Option<u64>,
    /// Worst acceptable time complexity.
    pub max_complexity: Option<ComplexityClass>,
    /// Run exactly this strategy, bypassing ranking.
    pub force_algorithm: Option<String>,
    /// Allow execution on the worker pool when the winner supports it.
    pub prefer_parallel: Option<bool>,
}

impl SelectorHint {
    /// An empty hint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the input size.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Builder: declare whether the input is sorted.
    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = Some(sorted);
        self
    }

    /// Builder: declare whether the input is nearly sorted.
    pub fn with_nearly_sorted(mut self, nearly_sorted: bool) -> Self {
        self.nearly_sorted = Some(nearly_sorted);
        self
    }

    /// Builder: prefer stable strategies.
    pub fn prefer_stable(mut self) -> Self {
        self.prefer_stable = Some(true);
        self
    }

    /// Builder: prefer in-place strategies.
    pub fn prefer_in_place(mut self) -> Self {
        self.prefer_in_place = Some(true);
        self
    }

    /// Builder: allow worker-pool execution.
    pub fn prefer_parallel(mut self) -> Self {
        self.prefer_parallel = Some(true);
        self
    }

    /// Builder: cap auxiliary memory.
    pub fn with_memory_budget(mut self, bytes: u64) -> Self {
        self.memory_budget_bytes = Some(bytes);
        self
    }

    /// Builder: cap time complexity.
    pub fn with_max_complexity(mut self, class: ComplexityClass) -> Self {
        self.max_complexity = Some(class);
        self
    }

    /// Builder: force a strategy by name.
    pub fn force(mut self, name: impl Into<String>) -> Self {
        self.force_algorithm = Some(name.into());
        self
    }

    /// Copy of this hint with `size` filled in when the caller left it unset.
    pub fn or_size(&self, size: u64) -> Self {
        let mut hint = self.clone();
        hint.size.get_or_insert(size);
        hint
    }

    /// The declared size, or zero when unknown.
    pub fn size_or_zero(&self) -> u64 {
        self.size.unwrap_or(0)
    }

    /// Whether `flag` is explicitly set to `true`.
    pub fn is(flag: Option<bool>) -> bool {
        flag == Some(true)
    }

    /// Reject contradictory combinations.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.sorted == Some(true) && self.nearly_sorted == Some(false) {
            return Err(EngineError::InvalidHint(
                "sorted = true contradicts nearly_sorted = false".to_string(),
            ));
        }
        if let Some(name) = &self.force_algorithm {
            if name.trim().is_empty() {
                return Err(EngineError::InvalidHint(
                    "force_algorithm must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
