#![deny(unsafe_code)]

//! The standard quiver strategy catalog.
//!
//! | Name | Category | Time | Space | Applies when |
//! |------|----------|------|-------|--------------|
//! | `insertion_sort` | sorting | O(n²) | O(1) | n ≤ 50, or sorted / nearly sorted |
//! | `merge_sort` | sorting | O(n log n) | O(n) | n > 50 |
//! | `heap_sort` | sorting | O(n log n) | O(1) | n > 50 |
//! | `quick_sort` | sorting | O(n log n) | O(log n) | n > 50, not flagged sorted |
//! | `parallel_merge_sort` | sorting | O(n log n) | O(n) | n ≥ 4096 |
//! | `linear_search` | searching | O(n) | O(1) | always |
//! | `binary_search` | searching | O(log n) | O(1) | flagged sorted |
//! | `naive_substring` | string | O(n²) | O(1) | always |
//! | `kmp_substring` | string | O(n) | O(n) | non-empty pattern |

use std::sync::Arc;

use quiver_core::{Category, EngineBuilder, RegistryError, SearchInput, SharedStrategy};

/// Element search strategies.
pub mod searching;
/// Comparison sorts.
pub mod sorting;
/// Substring search strategies.
pub mod text;

pub use searching::{BinarySearch, LinearSearch};
pub use sorting::{HeapSort, InsertionSort, MergeSort, ParallelMergeSort, QuickSort};
pub use text::{KmpSubstring, NaiveSubstring, SubstringInput};

/// Register every sorting strategy for `Vec<T>`.
pub fn register_sorting<T>(builder: &mut EngineBuilder) -> Result<(), RegistryError>
where
    T: Ord + Clone + Send + Sync + 'static,
{
    let strategies: [SharedStrategy<Vec<T>, Vec<T>>; 5] = [
        Arc::new(InsertionSort::new()),
        Arc::new(MergeSort::new()),
        Arc::new(HeapSort::new()),
        Arc::new(QuickSort::new()),
        Arc::new(ParallelMergeSort::new()),
    ];
    for strategy in strategies {
        builder.register(Category::Sorting, strategy)?;
    }
    Ok(())
}

/// Register every searching strategy for `SearchInput<T>`.
pub fn register_searching<T>(builder: &mut EngineBuilder) -> Result<(), RegistryError>
where
    T: Ord + Send + Sync + 'static,
{
    let strategies: [SharedStrategy<SearchInput<T>, Option<usize>>; 2] = [
        Arc::new(LinearSearch::new()),
        Arc::new(BinarySearch::new()),
    ];
    for strategy in strategies {
        builder.register(Category::Searching, strategy)?;
    }
    Ok(())
}

/// Register the substring strategies.
pub fn register_text(builder: &mut EngineBuilder) -> Result<(), RegistryError> {
    let strategies: [SharedStrategy<SubstringInput, Vec<usize>>; 2] = [
        Arc::new(NaiveSubstring::new()),
        Arc::new(KmpSubstring::new()),
    ];
    for strategy in strategies {
        builder.register(Category::StringProcessing, strategy)?;
    }
    Ok(())
}

/// Register the whole catalog for element type `T`.
///
/// The text strategies are not generic, so calling this twice on one
/// builder (for two element types) fails with a duplicate registration;
/// use [`register_sorting`] and [`register_searching`] for extra types.
pub fn register_standard_catalog<T>(builder: &mut EngineBuilder) -> Result<(), RegistryError>
where
    T: Ord + Clone + Send + Sync + 'static,
{
    register_sorting::<T>(builder)?;
    register_searching::<T>(builder)?;
    register_text(builder)?;
    tracing::debug!(
        element = std::any::type_name::<T>(),
        strategies = builder.registry().len(),
        "Standard catalog registered"
    );
    Ok(())
}
