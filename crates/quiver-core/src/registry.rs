//! Strategy registry keyed by [`StrategySignature`].
//!
//! The registry is append-only: strategies are registered once while the
//! engine is being built and then shared read-only. Each signature owns a
//! family of `Arc<dyn Strategy<I, O>>`; families with different type pairs
//! live side by side behind `dyn Any`.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::metadata::AlgoMetadata;
use crate::strategy::{Category, Strategy, StrategySignature};

/// A shared, type-erased handle to a registered strategy.
pub type SharedStrategy<I, O> = Arc<dyn Strategy<I, O>>;

type Family<I, O> = Vec<SharedStrategy<I, O>>;

/// Errors from strategy registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("strategy '{name}' is already registered for {signature}")]
    Duplicate { name: String, signature: String },

    #[error("signature {signature} does not describe strategy '{name}'")]
    SignatureMismatch { name: String, signature: String },

    #[error("strategy name must not be empty ({signature})")]
    EmptyName { signature: String },
}

/// One line of the registry listing.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    /// Rendered signature (e.g. `sorting(Vec<i64> -> Vec<i64>)`).
    pub signature: String,
    /// Category of the signature.
    pub category: Category,
    /// The strategy's descriptor.
    pub metadata: AlgoMetadata,
    /// Whether the strategy offers a worker-pool path.
    pub parallel_capable: bool,
}

/// Maps signatures to their registered strategies.
#[derive(Default)]
pub struct StrategyRegistry {
    families: HashMap<StrategySignature, Box<dyn Any + Send + Sync>>,
    catalog: Vec<CatalogEntry>,
}

impl StrategyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `strategy` as a candidate under `signature`.
    ///
    /// A second strategy with the same name under the same signature is
    /// rejected; the first registration stays in place.
    pub fn register<I: 'static, O: 'static>(
        &mut self,
        signature: StrategySignature,
        strategy: SharedStrategy<I, O>,
    ) -> Result<(), RegistryError> {
        let name = strategy.name().to_string();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName {
                signature: signature.to_string(),
            });
        }
        if !signature.matches::<I, O>() {
            return Err(RegistryError::SignatureMismatch {
                name,
                signature: signature.to_string(),
            });
        }

        let family = self
            .families
            .entry(signature)
            .or_insert_with(|| Box::new(Family::<I, O>::new()))
            .downcast_mut::<Family<I, O>>()
            .ok_or_else(|| RegistryError::SignatureMismatch {
                name: name.clone(),
                signature: signature.to_string(),
            })?;

        if family.iter().any(|existing| existing.name() == name) {
            return Err(RegistryError::Duplicate {
                name,
                signature: signature.to_string(),
            });
        }

        self.catalog.push(CatalogEntry {
            signature: signature.to_string(),
            category: signature.category(),
            metadata: strategy.metadata().clone(),
            parallel_capable: strategy.parallel_capable(),
        });
        family.push(strategy);

        tracing::debug!(strategy = %name, signature = %signature, "Registered strategy");
        Ok(())
    }

    /// Look up a strategy by exact name within a signature.
    pub fn find_by_name<I: 'static, O: 'static>(
        &self,
        name: &str,
        signature: &StrategySignature,
    ) -> Option<SharedStrategy<I, O>> {
        self.family::<I, O>(signature)?
            .iter()
            .find(|s| s.name() == name)
            .cloned()
    }

    /// All strategies registered under a signature, in registration order.
    ///
    /// An unknown signature yields an empty list, not an error.
    pub fn list_candidates<I: 'static, O: 'static>(
        &self,
        signature: &StrategySignature,
    ) -> Vec<SharedStrategy<I, O>> {
        self.family::<I, O>(signature)
            .map(|family| family.to_vec())
            .unwrap_or_default()
    }

    /// Every registered strategy, in registration order.
    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    /// Total number of registered strategies.
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    fn family<I: 'static, O: 'static>(
        &self,
        signature: &StrategySignature,
    ) -> Option<&Family<I, O>> {
        if !signature.matches::<I, O>() {
            return None;
        }
        self.families.get(signature)?.downcast_ref::<Family<I, O>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complexity::ComplexityClass;
    use crate::hint::SelectorHint;
    use crate::strategy::StrategyError;

    struct Reverse {
        meta: AlgoMetadata,
    }

    impl Reverse {
        fn named(name: &str) -> SharedStrategy<Vec<u8>, Vec<u8>> {
            Arc::new(Self {
                meta: AlgoMetadata::new(name, ComplexityClass::Linear),
            })
        }
    }

    impl Strategy<Vec<u8>, Vec<u8>> for Reverse {
        fn metadata(&self) -> &AlgoMetadata {
            &self.meta
        }

        fn can_apply(&self, _input: &Vec<u8>, _hint: &SelectorHint) -> Result<bool, StrategyError> {
            Ok(true)
        }

        fn execute(&self, mut input: Vec<u8>) -> Result<Vec<u8>, StrategyError> {
            input.reverse();
            Ok(input)
        }
    }

    fn sig() -> StrategySignature {
        StrategySignature::of::<Vec<u8>, Vec<u8>>(Category::Sorting)
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = StrategyRegistry::new();
        registry.register(sig(), Reverse::named("alpha")).unwrap();
        registry.register(sig(), Reverse::named("beta")).unwrap();

        assert_eq!(registry.len(), 2);
        let found = registry
            .find_by_name::<Vec<u8>, Vec<u8>>("beta", &sig())
            .unwrap();
        assert_eq!(found.name(), "beta");
        assert_eq!(found.execute(vec![1, 2, 3]).unwrap(), vec![3, 2, 1]);

        let names: Vec<String> = registry
            .list_candidates::<Vec<u8>, Vec<u8>>(&sig())
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = StrategyRegistry::new();
        registry.register(sig(), Reverse::named("alpha")).unwrap();
        let err = registry.register(sig(), Reverse::named("alpha")).unwrap_err();

        assert!(matches!(err, RegistryError::Duplicate { ref name, .. } if name == "alpha"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_same_name_in_other_signature_allowed() {
        let mut registry = StrategyRegistry::new();
        let searching = StrategySignature::of::<Vec<u8>, Vec<u8>>(Category::Searching);
        registry.register(sig(), Reverse::named("alpha")).unwrap();
        registry.register(searching, Reverse::named("alpha")).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_signature_mismatch_rejected() {
        let mut registry = StrategyRegistry::new();
        let wrong = StrategySignature::of::<String, String>(Category::Sorting);
        let err = registry.register(wrong, Reverse::named("alpha")).unwrap_err();
        assert!(matches!(err, RegistryError::SignatureMismatch { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = StrategyRegistry::new();
        let err = registry.register(sig(), Reverse::named(" ")).unwrap_err();
        assert!(matches!(err, RegistryError::EmptyName { .. }));
    }

    #[test]
    fn test_misses_are_not_errors() {
        let registry = StrategyRegistry::new();
        assert!(
            registry
                .find_by_name::<Vec<u8>, Vec<u8>>("ghost", &sig())
                .is_none()
        );
        assert!(registry.list_candidates::<Vec<u8>, Vec<u8>>(&sig()).is_empty());
        // Asking with the wrong type pair is also just a miss.
        assert!(registry.list_candidates::<String, String>(&sig()).is_empty());
    }

    #[test]
    fn test_catalog_lists_metadata() {
        let mut registry = StrategyRegistry::new();
        registry.register(sig(), Reverse::named("alpha")).unwrap();

        let entry = &registry.catalog()[0];
        assert_eq!(entry.metadata.name, "alpha");
        assert_eq!(entry.category, Category::Sorting);
        assert!(!entry.parallel_capable);
        assert!(entry.signature.starts_with("sorting("));
    }
}
