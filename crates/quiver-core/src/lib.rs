#![deny(unsafe_code)]

//! Quiver core: runtime selection among interchangeable algorithms.
//!
//! Concrete algorithms implement [`Strategy`] and are registered under a
//! [`StrategySignature`]. For each call the [`Selector`] filters the
//! registered candidates with their predicates and the caller's
//! [`SelectorHint`], ranks the survivors, and the [`Engine`] runs the winner,
//! either inline or on the bounded [`WorkerPool`] with a synchronous
//! fallback.

/// Complexity classes and the ranker that orders them.
pub mod complexity;
/// Run a strategy by exact name.
pub mod direct;
/// Engine facade and builder.
pub mod engine;
/// Caller-facing error taxonomy.
pub mod error;
/// Per-call selection hints.
pub mod hint;
/// Immutable per-strategy descriptors.
pub mod metadata;
/// Strategy registry keyed by signature.
pub mod registry;
/// Filtering and ranking of candidates.
pub mod selector;
/// The strategy trait and signatures.
pub mod strategy;
/// Bounded worker pool and its backends.
pub mod worker;

pub use complexity::{ComplexityClass, ComplexityRanker, RankerPreset};
pub use direct::DirectExecutor;
pub use engine::{
    Engine, EngineBuilder, ExecutionMode, Explanation, SearchInput, SearchSuccess, SortSuccess,
    Success,
};
pub use error::EngineError;
pub use hint::SelectorHint;
pub use metadata::AlgoMetadata;
pub use registry::{CatalogEntry, RegistryError, SharedStrategy, StrategyRegistry};
pub use selector::{RejectReason, Rejection, Selector};
pub use strategy::{Category, Strategy, StrategyError, StrategySignature};
pub use worker::{BackendPreference, PoolStats, WorkerBackend, WorkerError, WorkerPool};
