//! Element search over `SearchInput<T>`, yielding the index of the first match.

use quiver_core::{
    AlgoMetadata, ComplexityClass, SearchInput, SelectorHint, Strategy, StrategyError,
};

/// Scans left to right. Applies to any input.
pub struct LinearSearch {
    meta: AlgoMetadata,
}

impl LinearSearch {
    pub fn new() -> Self {
        Self {
            meta: AlgoMetadata::new("linear_search", ComplexityClass::Linear)
                .with_description("Sequential scan; works on unsorted input"),
        }
    }
}

impl Default for LinearSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq + Send + Sync> Strategy<SearchInput<T>, Option<usize>> for LinearSearch {
    fn metadata(&self) -> &AlgoMetadata {
        &self.meta
    }

    fn can_apply(
        &self,
        _input: &SearchInput<T>,
        _hint: &SelectorHint,
    ) -> Result<bool, StrategyError> {
        Ok(true)
    }

    fn execute(&self, input: SearchInput<T>) -> Result<Option<usize>, StrategyError> {
        Ok(input.haystack.iter().position(|x| *x == input.target))
    }
}

/// Halving search. Only offered when the caller declares the input sorted;
/// the claim is trusted, not checked.
pub struct BinarySearch {
    meta: AlgoMetadata,
}

impl BinarySearch {
    pub fn new() -> Self {
        Self {
            meta: AlgoMetadata::new("binary_search", ComplexityClass::Logarithmic)
                .with_description("Halving search over ascending input"),
        }
    }
}

impl Default for BinarySearch {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Send + Sync> Strategy<SearchInput<T>, Option<usize>> for BinarySearch {
    fn metadata(&self) -> &AlgoMetadata {
        &self.meta
    }

    fn can_apply(
        &self,
        _input: &SearchInput<T>,
        hint: &SelectorHint,
    ) -> Result<bool, StrategyError> {
        Ok(SelectorHint::is(hint.sorted))
    }

    fn execute(&self, input: SearchInput<T>) -> Result<Option<usize>, StrategyError> {
        let SearchInput { haystack, target } = input;
        // Leftmost match, so duplicates resolve like the linear scan.
        let index = haystack.partition_point(|x| *x < target);
        Ok((haystack.get(index) == Some(&target)).then_some(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(haystack: &[i32], target: i32) -> SearchInput<i32> {
        SearchInput {
            haystack: haystack.to_vec(),
            target,
        }
    }

    #[test]
    fn test_linear_search_first_occurrence() {
        let search = LinearSearch::new();
        assert_eq!(search.execute(query(&[4, 2, 7, 2], 2)).unwrap(), Some(1));
        assert_eq!(search.execute(query(&[4, 2, 7], 9)).unwrap(), None);
        assert_eq!(search.execute(query(&[], 1)).unwrap(), None);
    }

    #[test]
    fn test_binary_search_leftmost() {
        let search = BinarySearch::new();
        let sorted = [1, 3, 3, 3, 8, 13];
        assert_eq!(search.execute(query(&sorted, 3)).unwrap(), Some(1));
        assert_eq!(search.execute(query(&sorted, 13)).unwrap(), Some(5));
        assert_eq!(search.execute(query(&sorted, 1)).unwrap(), Some(0));
        assert_eq!(search.execute(query(&sorted, 4)).unwrap(), None);
        assert_eq!(search.execute(query(&sorted, 99)).unwrap(), None);
        assert_eq!(search.execute(query(&[], 1)).unwrap(), None);
    }

    #[test]
    fn test_binary_search_needs_sorted_hint() {
        let search = BinarySearch::new();
        let input = query(&[1, 2, 3], 2);
        assert!(!search.can_apply(&input, &SelectorHint::new()).unwrap());
        assert!(!search.can_apply(&input, &SelectorHint::new().with_sorted(false)).unwrap());
        assert!(search.can_apply(&input, &SelectorHint::new().with_sorted(true)).unwrap());
    }
}
