//! Failures surfaced to engine callers.

use crate::strategy::StrategyError;

/// Errors returned by selection and execution.
///
/// Configuration failures come in three variants ([`InvalidHint`],
/// [`Predicate`] and [`Configuration`]); match on
/// [`is_configuration`](EngineError::is_configuration) to treat them as one
/// family.
///
/// [`InvalidHint`]: EngineError::InvalidHint
/// [`Predicate`]: EngineError::Predicate
/// [`Configuration`]: EngineError::Configuration
///
/// Worker-pool failures never appear here: they are recovered by the
/// synchronous fallback, and only a failing fallback reaches the caller as
/// [`EngineError::Execution`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No registered strategy survives filtering, or a forced or directly
    /// named strategy is not registered.
    #[error("no strategy available for {signature}: {reason}")]
    NoStrategy { signature: String, reason: String },

    /// The hint is self-contradictory.
    #[error("invalid hint: {0}")]
    InvalidHint(String),

    /// A strategy predicate returned an error or panicked while being
    /// evaluated.
    #[error("predicate of strategy '{strategy}' failed: {source}")]
    Predicate {
        strategy: String,
        #[source]
        source: StrategyError,
    },

    /// The engine itself is misconfigured (unknown ranker class, duplicate
    /// registration, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The selected strategy failed while running.
    #[error("strategy '{strategy}' failed: {source}")]
    Execution {
        strategy: String,
        #[source]
        source: StrategyError,
    },
}

impl EngineError {
    /// Whether this error belongs to the configuration family: bad hints,
    /// failing predicates, or engine misconfiguration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidHint(_)
                | EngineError::Predicate { .. }
                | EngineError::Configuration(_)
        )
    }

    pub(crate) fn no_strategy(signature: impl ToString, reason: impl Into<String>) -> Self {
        EngineError::NoStrategy {
            signature: signature.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_execution_keeps_cause() {
        let err = EngineError::Execution {
            strategy: "merge_sort".to_string(),
            source: StrategyError::Failed("disk on fire".to_string()),
        };
        assert_eq!(err.to_string(), "strategy 'merge_sort' failed: disk on fire");
        assert_eq!(err.source().unwrap().to_string(), "disk on fire");
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_configuration_family() {
        assert!(EngineError::InvalidHint("x".to_string()).is_configuration());
        assert!(EngineError::Configuration("x".to_string()).is_configuration());
        assert!(
            EngineError::Predicate {
                strategy: "p".to_string(),
                source: StrategyError::Failed("x".to_string()),
            }
            .is_configuration()
        );
        assert!(!EngineError::no_strategy("sorting(a -> b)", "empty").is_configuration());
    }

    #[test]
    fn test_no_strategy_display() {
        let err = EngineError::no_strategy("sorting(a -> b)", "no candidate applies");
        assert_eq!(
            err.to_string(),
            "no strategy available for sorting(a -> b): no candidate applies"
        );
    }
}
