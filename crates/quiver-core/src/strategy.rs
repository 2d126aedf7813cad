//! The strategy capability contract and the signature that groups strategies.
//!
//! Every concrete algorithm implements [`Strategy`] for one `(input, output)`
//! type pair. Strategies sharing a [`StrategySignature`] are mutually
//! substitutable: the selector may pick any of them for the same call.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::Serialize;

use crate::hint::SelectorHint;
use crate::metadata::AlgoMetadata;

/// Errors raised by a strategy's predicate or body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrategyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Failed(String),

    #[error("strategy panicked: {0}")]
    Panicked(String),
}

/// A concrete algorithm behind the `{can_apply, execute, metadata}` contract.
///
/// Implementations are stateless, side-effect free and shared across
/// threads for the lifetime of the engine.
pub trait Strategy<I, O>: Send + Sync {
    /// The immutable descriptor for this strategy.
    fn metadata(&self) -> &AlgoMetadata;

    /// Whether this strategy is suitable for `input` under `hint`.
    ///
    /// Runs for every candidate on every call, so it must be cheap
    /// (constant or logarithmic in the input size). An `Err` aborts the
    /// whole selection rather than excluding this candidate.
    fn can_apply(&self, input: &I, hint: &SelectorHint) -> Result<bool, StrategyError>;

    /// Run the algorithm on the calling thread.
    fn execute(&self, input: I) -> Result<O, StrategyError>;

    /// Whether [`execute_parallel`](Strategy::execute_parallel) is worth
    /// dispatching to the worker pool.
    fn parallel_capable(&self) -> bool {
        false
    }

    /// The parallel path, run on a worker. Defaults to [`execute`](Strategy::execute).
    fn execute_parallel(&self, input: I) -> Result<O, StrategyError> {
        self.execute(input)
    }

    /// Shorthand for `metadata().name`.
    fn name(&self) -> &str {
        &self.metadata().name
    }
}

/// Run a strategy body, turning a panic into [`StrategyError::Panicked`].
///
/// Strategies are stateless, so observing one after it unwound is sound.
pub(crate) fn guarded<T>(
    body: impl FnOnce() -> Result<T, StrategyError>,
) -> Result<T, StrategyError> {
    catch_unwind(AssertUnwindSafe(body))
        .unwrap_or_else(|payload| Err(StrategyError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Problem family a strategy belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Sorting,
    Searching,
    Graph,
    DynamicProgramming,
    StringProcessing,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Sorting => write!(f, "sorting"),
            Category::Searching => write!(f, "searching"),
            Category::Graph => write!(f, "graph"),
            Category::DynamicProgramming => write!(f, "dynamic-programming"),
            Category::StringProcessing => write!(f, "string-processing"),
        }
    }
}

/// Registry key: `(input type, output type, category)`.
///
/// Identity is by [`TypeId`]; the type names are kept for display only.
#[derive(Debug, Clone, Copy)]
pub struct StrategySignature {
    input: TypeId,
    output: TypeId,
    input_name: &'static str,
    output_name: &'static str,
    category: Category,
}

impl StrategySignature {
    /// The signature for strategies mapping `I` to `O` within `category`.
    pub fn of<I: 'static, O: 'static>(category: Category) -> Self {
        Self {
            input: TypeId::of::<I>(),
            output: TypeId::of::<O>(),
            input_name: type_name::<I>(),
            output_name: type_name::<O>(),
            category,
        }
    }

    /// Whether this signature describes an `I → O` mapping.
    pub fn matches<I: 'static, O: 'static>(&self) -> bool {
        self.input == TypeId::of::<I>() && self.output == TypeId::of::<O>()
    }

    /// The category component.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Display name of the input type.
    pub fn input_name(&self) -> &'static str {
        self.input_name
    }

    /// Display name of the output type.
    pub fn output_name(&self) -> &'static str {
        self.output_name
    }
}

impl PartialEq for StrategySignature {
    fn eq(&self, other: &Self) -> bool {
        self.input == other.input && self.output == other.output && self.category == other.category
    }
}

impl Eq for StrategySignature {}

impl Hash for StrategySignature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.input.hash(state);
        self.output.hash(state);
        self.category.hash(state);
    }
}

impl fmt::Display for StrategySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({} -> {})",
            self.category, self.input_name, self.output_name
        )
    }
}
