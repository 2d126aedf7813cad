//! Strategy selection.
//!
//! Selection is a pure function of the registry, the input and the hint. It
//! runs on the caller's thread and only reads shared state:
//!
//! 1. validate the hint;
//! 2. honour `force_algorithm` by exact name, skipping everything below;
//! 3. keep candidates whose predicate accepts the input;
//! 4. drop candidates above `max_complexity` or over `memory_budget_bytes`
//!    (without a size, only constant-space candidates can fit a budget);
//! 5. order the survivors by complexity rank, unmet preferences, stability,
//!    estimated memory, and finally name.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::complexity::{ComplexityClass, ComplexityRanker};
use crate::error::EngineError;
use crate::hint::SelectorHint;
use crate::metadata::AlgoMetadata;
use crate::registry::{SharedStrategy, StrategyRegistry};
use crate::strategy::{StrategySignature, guarded};

/// Why a registered candidate was not eligible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Its predicate returned `false`.
    NotApplicable,
    /// Its time complexity ranks worse than the hint's threshold.
    TooComplex,
    /// Its estimated memory exceeds the hint's budget.
    OverBudget { estimated_bytes: u64 },
    /// Its memory grows with the input, a budget is set and the size is unknown.
    UnknownSize,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NotApplicable => write!(f, "not applicable"),
            RejectReason::TooComplex => write!(f, "above max complexity"),
            RejectReason::OverBudget { estimated_bytes } => {
                write!(f, "over memory budget (needs ~{estimated_bytes} bytes)")
            }
            RejectReason::UnknownSize => {
                write!(f, "memory grows with input size, which the hint omits")
            }
        }
    }
}

/// A rejected candidate and the reason.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub name: String,
    pub reason: RejectReason,
}

/// Full outcome of evaluating every candidate for one call.
pub struct Evaluation<I, O> {
    /// Eligible candidates, best first.
    pub ranked: Vec<SharedStrategy<I, O>>,
    /// Candidates that were filtered out, in registration order.
    pub rejected: Vec<Rejection>,
    /// Whether the winner came from `force_algorithm`.
    pub forced: bool,
}

impl<I, O> Evaluation<I, O> {
    /// The winning candidate, if any survived.
    pub fn winner(&self) -> Option<&SharedStrategy<I, O>> {
        self.ranked.first()
    }
}

/// Ranks registered strategies against an input and a hint.
#[derive(Clone)]
pub struct Selector {
    registry: Arc<StrategyRegistry>,
    ranker: ComplexityRanker,
}

impl Selector {
    /// Create a selector over a frozen registry.
    pub fn new(registry: Arc<StrategyRegistry>, ranker: ComplexityRanker) -> Self {
        Self { registry, ranker }
    }

    /// The ranker in use.
    pub fn ranker(&self) -> &ComplexityRanker {
        &self.ranker
    }

    /// The registry being selected from.
    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Pick the single best strategy for `input` under `hint`.
    pub fn select<I: 'static, O: 'static>(
        &self,
        signature: &StrategySignature,
        input: &I,
        hint: &SelectorHint,
    ) -> Result<SharedStrategy<I, O>, EngineError> {
        let evaluation = self.evaluate::<I, O>(signature, input, hint)?;
        let considered = evaluation.ranked.len() + evaluation.rejected.len();

        let Some(winner) = evaluation.ranked.into_iter().next() else {
            let reason = if considered == 0 {
                self.missing_family(signature)
            } else {
                format!("all {considered} candidates were filtered out")
            };
            return Err(EngineError::no_strategy(signature, reason));
        };

        tracing::info!(
            strategy = %winner.name(),
            signature = %signature,
            candidates = considered,
            forced = evaluation.forced,
            "Selected strategy"
        );
        Ok(winner)
    }

    /// Evaluate every candidate and return the ranking with rejections.
    ///
    /// Fails only for an invalid hint, an unregistered forced name, or a
    /// predicate that errors; an empty ranking is not an error here.
    pub fn evaluate<I: 'static, O: 'static>(
        &self,
        signature: &StrategySignature,
        input: &I,
        hint: &SelectorHint,
    ) -> Result<Evaluation<I, O>, EngineError> {
        hint.validate()?;

        if let Some(name) = &hint.force_algorithm {
            let forced = self
                .registry
                .find_by_name::<I, O>(name, signature)
                .ok_or_else(|| {
                    EngineError::no_strategy(
                        signature,
                        format!("forced strategy '{name}' is not registered"),
                    )
                })?;
            return Ok(Evaluation {
                ranked: vec![forced],
                rejected: Vec::new(),
                forced: true,
            });
        }

        let mut ranked = Vec::new();
        let mut rejected = Vec::new();

        for candidate in self.registry.list_candidates::<I, O>(signature) {
            let applies = guarded(|| candidate.can_apply(input, hint))
                .map_err(|source| EngineError::Predicate {
                    strategy: candidate.name().to_string(),
                    source,
                })?;

            let meta = candidate.metadata();
            let verdict = if !applies {
                Some(RejectReason::NotApplicable)
            } else if hint
                .max_complexity
                .is_some_and(|max| !self.ranker.within(meta.time_complexity, max))
            {
                Some(RejectReason::TooComplex)
            } else {
                hint.memory_budget_bytes
                    .and_then(|budget| over_budget(meta, hint.size, budget))
            };

            match verdict {
                Some(reason) => {
                    tracing::debug!(
                        strategy = %candidate.name(),
                        reason = %reason,
                        "Candidate rejected"
                    );
                    rejected.push(Rejection {
                        name: candidate.name().to_string(),
                        reason,
                    });
                }
                None => ranked.push(candidate),
            }
        }

        ranked.sort_by(|a, b| {
            self.order(
                (a.metadata(), a.parallel_capable()),
                (b.metadata(), b.parallel_capable()),
                hint,
            )
        });

        Ok(Evaluation {
            ranked,
            rejected,
            forced: false,
        })
    }

    /// Explain an empty signature family, listing the families registered
    /// under the same category so a type mismatch is easy to spot.
    fn missing_family(&self, signature: &StrategySignature) -> String {
        let category = signature.category();
        let mut families: Vec<&str> = self
            .registry
            .catalog()
            .iter()
            .filter(|entry| entry.category == category)
            .map(|entry| entry.signature.as_str())
            .collect();
        families.sort_unstable();
        families.dedup();
        if families.is_empty() {
            format!("no {category} strategies are registered")
        } else {
            format!(
                "nothing is registered for this signature; {category} strategies exist for {}",
                families.join(", ")
            )
        }
    }

    fn order(
        &self,
        (a, a_parallel): (&AlgoMetadata, bool),
        (b, b_parallel): (&AlgoMetadata, bool),
        hint: &SelectorHint,
    ) -> Ordering {
        let size = hint.size_or_zero();
        self.ranker
            .compare(a.time_complexity, b.time_complexity)
            .then_with(|| {
                unmet_preferences(a, a_parallel, hint).cmp(&unmet_preferences(b, b_parallel, hint))
            })
            .then_with(|| b.stable.cmp(&a.stable))
            .then_with(|| {
                a.estimated_memory_bytes(size)
                    .cmp(&b.estimated_memory_bytes(size))
            })
            .then_with(|| a.name.cmp(&b.name))
    }
}

/// Budget verdict for one candidate. An unknown size only admits
/// constant-space candidates.
fn over_budget(meta: &AlgoMetadata, size: Option<u64>, budget: u64) -> Option<RejectReason> {
    if size.is_none() && meta.space_complexity != ComplexityClass::Constant {
        return Some(RejectReason::UnknownSize);
    }
    let estimated_bytes = meta.estimated_memory_bytes(size.unwrap_or(0));
    (estimated_bytes > budget).then_some(RejectReason::OverBudget { estimated_bytes })
}

/// Number of soft preferences in `hint` that `meta` does not satisfy.
fn unmet_preferences(meta: &AlgoMetadata, parallel_capable: bool, hint: &SelectorHint) -> u8 {
    let mut unmet = 0;
    if SelectorHint::is(hint.prefer_stable) && !meta.stable {
        unmet += 1;
    }
    if SelectorHint::is(hint.prefer_in_place) && !meta.in_place {
        unmet += 1;
    }
    if SelectorHint::is(hint.prefer_parallel) && !parallel_capable {
        unmet += 1;
    }
    unmet
}
