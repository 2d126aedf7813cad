//! Comparison sorts over `Vec<T>`.
//!
//! All strategies here consume the input vector and return it sorted in
//! ascending order. Predicates look only at `hint.size` (falling back to
//! the vector's length), never at the elements.

use std::cmp::Ordering;

use quiver_core::{AlgoMetadata, ComplexityClass, SelectorHint, Strategy, StrategyError};

/// Inputs at or below this size count as small.
pub const SMALL_INPUT: u64 = 50;

/// Smallest input worth handing to rayon.
pub const PARALLEL_THRESHOLD: u64 = 4096;

/// Slices this short are finished with insertion sort inside quick sort.
const QUICK_CUTOFF: usize = 16;

fn input_size<T>(input: &[T], hint: &SelectorHint) -> u64 {
    hint.size.unwrap_or(input.len() as u64)
}

fn presorted(hint: &SelectorHint) -> bool {
    SelectorHint::is(hint.sorted) || SelectorHint::is(hint.nearly_sorted)
}

// ── Insertion sort ──────────────────────────────────────────────────────

/// Quadratic but allocation-free and linear on sorted input.
pub struct InsertionSort {
    meta: AlgoMetadata,
}

impl InsertionSort {
    pub fn new() -> Self {
        Self {
            meta: AlgoMetadata::new("insertion_sort", ComplexityClass::Quadratic)
                .stable()
                .in_place()
                .with_description("Shifts elements into place; fast on small or presorted input"),
        }
    }
}

impl Default for InsertionSort {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Send + Sync> Strategy<Vec<T>, Vec<T>> for InsertionSort {
    fn metadata(&self) -> &AlgoMetadata {
        &self.meta
    }

    fn can_apply(&self, input: &Vec<T>, hint: &SelectorHint) -> Result<bool, StrategyError> {
        Ok(input_size(input, hint) <= SMALL_INPUT || presorted(hint))
    }

    fn execute(&self, mut input: Vec<T>) -> Result<Vec<T>, StrategyError> {
        insertion_sort(&mut input);
        Ok(input)
    }
}

pub(crate) fn insertion_sort<T: Ord>(items: &mut [T]) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && items[j - 1] > items[j] {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

// ── Merge sort ──────────────────────────────────────────────────────────

/// Stable top-down merge sort with a half-size scratch buffer per merge.
pub struct MergeSort {
    meta: AlgoMetadata,
}

impl MergeSort {
    pub fn new() -> Self {
        Self {
            meta: AlgoMetadata::new("merge_sort", ComplexityClass::Linearithmic)
                .with_space(ComplexityClass::Linear)
                .stable()
                .with_description("Top-down merge sort; stable, needs a linear buffer"),
        }
    }
}

impl Default for MergeSort {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone + Send + Sync> Strategy<Vec<T>, Vec<T>> for MergeSort {
    fn metadata(&self) -> &AlgoMetadata {
        &self.meta
    }

    fn can_apply(&self, input: &Vec<T>, hint: &SelectorHint) -> Result<bool, StrategyError> {
        Ok(input_size(input, hint) > SMALL_INPUT)
    }

    fn execute(&self, mut input: Vec<T>) -> Result<Vec<T>, StrategyError> {
        merge_sort(&mut input);
        Ok(input)
    }
}

pub(crate) fn merge_sort<T: Ord + Clone>(items: &mut [T]) {
    let len = items.len();
    if len <= 1 {
        return;
    }
    let mid = len / 2;
    merge_sort(&mut items[..mid]);
    merge_sort(&mut items[mid..]);
    if items[mid - 1] <= items[mid] {
        return;
    }

    // The write cursor never passes the right-hand read cursor, so only
    // the left half needs a copy.
    let left = items[..mid].to_vec();
    let (mut i, mut j, mut k) = (0, mid, 0);
    while i < left.len() && j < len {
        if left[i] <= items[j] {
            items[k] = left[i].clone();
            i += 1;
        } else {
            items[k] = items[j].clone();
            j += 1;
        }
        k += 1;
    }
    while i < left.len() {
        items[k] = left[i].clone();
        i += 1;
        k += 1;
    }
}

// ── Heap sort ───────────────────────────────────────────────────────────

/// In-place heap sort: constant extra space, not stable.
pub struct HeapSort {
    meta: AlgoMetadata,
}

impl HeapSort {
    pub fn new() -> Self {
        Self {
            meta: AlgoMetadata::new("heap_sort", ComplexityClass::Linearithmic)
                .in_place()
                .with_description("Binary max-heap sort; constant extra space"),
        }
    }
}

impl Default for HeapSort {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Send + Sync> Strategy<Vec<T>, Vec<T>> for HeapSort {
    fn metadata(&self) -> &AlgoMetadata {
        &self.meta
    }

    fn can_apply(&self, input: &Vec<T>, hint: &SelectorHint) -> Result<bool, StrategyError> {
        Ok(input_size(input, hint) > SMALL_INPUT)
    }

    fn execute(&self, mut input: Vec<T>) -> Result<Vec<T>, StrategyError> {
        heap_sort(&mut input);
        Ok(input)
    }
}

pub(crate) fn heap_sort<T: Ord>(items: &mut [T]) {
    let len = items.len();
    for start in (0..len / 2).rev() {
        sift_down(items, start, len);
    }
    for end in (1..len).rev() {
        items.swap(0, end);
        sift_down(items, 0, end);
    }
}

fn sift_down<T: Ord>(items: &mut [T], mut root: usize, end: usize) {
    loop {
        let mut child = 2 * root + 1;
        if child >= end {
            break;
        }
        if child + 1 < end && items[child] < items[child + 1] {
            child += 1;
        }
        if items[root] >= items[child] {
            break;
        }
        items.swap(root, child);
        root = child;
    }
}

// ── Quick sort ──────────────────────────────────────────────────────────

/// Three-way quick sort with a median-of-three pivot.
///
/// Recurses into the smaller partition only, so stack depth stays
/// logarithmic even on adversarial input.
pub struct QuickSort {
    meta: AlgoMetadata,
}

impl QuickSort {
    pub fn new() -> Self {
        Self {
            meta: AlgoMetadata::new("quick_sort", ComplexityClass::Linearithmic)
                .with_space(ComplexityClass::Logarithmic)
                .in_place()
                .with_description("Three-way quick sort, median-of-three pivot"),
        }
    }
}

impl Default for QuickSort {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone + Send + Sync> Strategy<Vec<T>, Vec<T>> for QuickSort {
    fn metadata(&self) -> &AlgoMetadata {
        &self.meta
    }

    fn can_apply(&self, input: &Vec<T>, hint: &SelectorHint) -> Result<bool, StrategyError> {
        Ok(input_size(input, hint) > SMALL_INPUT && !SelectorHint::is(hint.sorted))
    }

    fn execute(&self, mut input: Vec<T>) -> Result<Vec<T>, StrategyError> {
        quick_sort(&mut input);
        Ok(input)
    }
}

pub(crate) fn quick_sort<T: Ord + Clone>(mut items: &mut [T]) {
    while items.len() > QUICK_CUTOFF {
        let (lt, gt) = partition(items);
        let (head, rest) = std::mem::take(&mut items).split_at_mut(lt);
        let tail = &mut rest[gt - lt..];
        if head.len() < tail.len() {
            quick_sort(head);
            items = tail;
        } else {
            quick_sort(tail);
            items = head;
        }
    }
    insertion_sort(items);
}

/// Partition around a median-of-three pivot.
///
/// Returns `(lt, gt)` such that `items[..lt] < pivot`,
/// `items[lt..gt] == pivot` and `items[gt..] > pivot`.
fn partition<T: Ord + Clone>(items: &mut [T]) -> (usize, usize) {
    let (a, b, c) = (0, items.len() / 2, items.len() - 1);
    if items[b] < items[a] {
        items.swap(a, b);
    }
    if items[c] < items[b] {
        items.swap(b, c);
        if items[b] < items[a] {
            items.swap(a, b);
        }
    }
    items.swap(0, b);

    let pivot = items[0].clone();
    let (mut lt, mut i, mut gt) = (0, 1, items.len());
    while i < gt {
        match items[i].cmp(&pivot) {
            Ordering::Less => {
                items.swap(lt, i);
                lt += 1;
                i += 1;
            }
            Ordering::Greater => {
                gt -= 1;
                items.swap(i, gt);
            }
            Ordering::Equal => i += 1,
        }
    }
    (lt, gt)
}

// ── Parallel merge sort ─────────────────────────────────────────────────

/// Stable sort whose worker path runs on rayon's thread pool.
///
/// The synchronous path is the plain merge sort, so the pool's fallback
/// still produces a stable result.
pub struct ParallelMergeSort {
    meta: AlgoMetadata,
}

impl ParallelMergeSort {
    pub fn new() -> Self {
        Self {
            meta: AlgoMetadata::new("parallel_merge_sort", ComplexityClass::Linearithmic)
                .with_space(ComplexityClass::Linear)
                .stable()
                .with_description("Merge sort split across rayon workers; for large inputs"),
        }
    }
}

impl Default for ParallelMergeSort {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone + Send + Sync> Strategy<Vec<T>, Vec<T>> for ParallelMergeSort {
    fn metadata(&self) -> &AlgoMetadata {
        &self.meta
    }

    fn can_apply(&self, input: &Vec<T>, hint: &SelectorHint) -> Result<bool, StrategyError> {
        Ok(input_size(input, hint) >= PARALLEL_THRESHOLD)
    }

    fn execute(&self, mut input: Vec<T>) -> Result<Vec<T>, StrategyError> {
        merge_sort(&mut input);
        Ok(input)
    }

    fn parallel_capable(&self) -> bool {
        true
    }

    fn execute_parallel(&self, mut input: Vec<T>) -> Result<Vec<T>, StrategyError> {
        use rayon::slice::ParallelSliceMut;

        tracing::debug!(
            len = input.len(),
            threads = rayon::current_num_threads(),
            "Parallel merge sort"
        );
        input.par_sort();
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shuffled(len: u64) -> Vec<u64> {
        // Deterministic scramble with plenty of duplicates.
        (0..len).map(|i| (i * 7919 + 13) % (len / 3 + 1)).collect()
    }

    fn check(sort: impl Fn(&mut [u64])) {
        for len in [0, 1, 2, 3, 17, 64, 257, 1000] {
            let mut items = shuffled(len);
            let mut expected = items.clone();
            expected.sort();
            sort(&mut items);
            assert_eq!(items, expected, "len {len}");
        }
    }

    #[test]
    fn test_insertion_sort() {
        check(insertion_sort);
    }

    #[test]
    fn test_merge_sort() {
        check(merge_sort);
    }

    #[test]
    fn test_heap_sort() {
        check(heap_sort);
    }

    #[test]
    fn test_quick_sort() {
        check(quick_sort);
    }

    #[test]
    fn test_quick_sort_all_equal_and_descending() {
        let mut equal = vec![4u8; 5000];
        quick_sort(&mut equal);
        assert!(equal.iter().all(|&x| x == 4));

        let mut descending: Vec<u32> = (0..5000).rev().collect();
        quick_sort(&mut descending);
        assert_eq!(descending, (0..5000).collect::<Vec<_>>());
    }

    #[test]
    fn test_merge_sort_is_stable() {
        #[derive(Debug, Clone, PartialEq, Eq)]
        struct Keyed(u8, usize);
        impl PartialOrd for Keyed {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }
        impl Ord for Keyed {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.cmp(&other.0)
            }
        }

        let mut items: Vec<Keyed> = (0..200).map(|i| Keyed((i % 5) as u8, i)).collect();
        merge_sort(&mut items);
        for pair in items.windows(2) {
            if pair[0].0 == pair[1].0 {
                assert!(pair[0].1 < pair[1].1);
            }
        }
    }

    #[test]
    fn test_parallel_path_matches_sequential() {
        let sort = ParallelMergeSort::new();
        let input = shuffled(10_000);
        let sequential = Strategy::<Vec<u64>, Vec<u64>>::execute(&sort, input.clone()).unwrap();
        let parallel = sort.execute_parallel(input).unwrap();
        assert_eq!(sequential, parallel);
        assert!(Strategy::<Vec<u64>, Vec<u64>>::parallel_capable(&sort));
    }

    #[test]
    fn test_predicates() {
        let small = vec![3u32, 1, 2];
        let none = SelectorHint::new();
        let large = SelectorHint::new().with_size(10_000);
        let sorted_large = large.clone().with_sorted(true);

        let applies = |s: &dyn Strategy<Vec<u32>, Vec<u32>>, hint: &SelectorHint| {
            s.can_apply(&small, hint).unwrap()
        };

        assert!(applies(&InsertionSort::new(), &none));
        assert!(!applies(&InsertionSort::new(), &large));
        assert!(applies(&InsertionSort::new(), &sorted_large));

        assert!(!applies(&MergeSort::new(), &none));
        assert!(applies(&MergeSort::new(), &large));
        assert!(applies(&HeapSort::new(), &large));

        assert!(applies(&QuickSort::new(), &large));
        assert!(!applies(&QuickSort::new(), &sorted_large));

        assert!(applies(&ParallelMergeSort::new(), &large));
        assert!(!applies(&ParallelMergeSort::new(), &SelectorHint::new().with_size(4095)));
    }
}
