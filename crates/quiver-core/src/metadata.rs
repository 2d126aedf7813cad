//! Immutable per-strategy descriptors.

use serde::Serialize;

use crate::complexity::ComplexityClass;

/// Bytes charged per unit of space growth when estimating memory use.
pub const WORD_BYTES: u64 = 8;

/// Descriptor a strategy declares once, at construction.
///
/// Built with the `with_*` methods and never mutated after registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlgoMetadata {
    /// Unique name within a signature (e.g. "merge_sort").
    pub name: String,
    /// Time complexity class.
    pub time_complexity: ComplexityClass,
    /// Auxiliary space complexity class.
    pub space_complexity: ComplexityClass,
    /// Whether equal elements keep their relative order.
    pub stable: bool,
    /// Whether the strategy works within the input's own storage.
    pub in_place: bool,
    /// Fixed memory overhead in bytes, independent of input size.
    pub memory_overhead_bytes: u64,
    /// Human-readable description.
    pub description: String,
}

impl AlgoMetadata {
    /// Create a descriptor with the given name and time complexity.
    ///
    /// Defaults: constant space, unstable, not in place, no fixed overhead.
    pub fn new(name: impl Into<String>, time_complexity: ComplexityClass) -> Self {
        Self {
            name: name.into(),
            time_complexity,
            space_complexity: ComplexityClass::Constant,
            stable: false,
            in_place: false,
            memory_overhead_bytes: 0,
            description: String::new(),
        }
    }

    /// Builder: set the space complexity.
    pub fn with_space(mut self, class: ComplexityClass) -> Self {
        self.space_complexity = class;
        self
    }

    /// Builder: mark the strategy as stable.
    pub fn stable(mut self) -> Self {
        self.stable = true;
        self
    }

    /// Builder: mark the strategy as in place.
    pub fn in_place(mut self) -> Self {
        self.in_place = true;
        self
    }

    /// Builder: set the fixed memory overhead.
    pub fn with_overhead(mut self, bytes: u64) -> Self {
        self.memory_overhead_bytes = bytes;
        self
    }

    /// Builder: set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Estimated auxiliary memory for an input of `n` elements.
    pub fn estimated_memory_bytes(&self, n: u64) -> u64 {
        self.memory_overhead_bytes
            .saturating_add(self.space_complexity.growth(n).saturating_mul(WORD_BYTES))
    }
}
