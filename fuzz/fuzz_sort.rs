//! Fuzz target for the sorting strategies.
//!
//! Run with: cargo +nightly fuzz run fuzz_sort
//!
//! Runs every registered sort by name on the same input and checks each
//! output against the standard library's stable sort.

#![no_main]

use std::sync::LazyLock;

use libfuzzer_sys::fuzz_target;
use quiver_core::{Category, Engine, EngineBuilder};

const SORTS: [&str; 5] = [
    "insertion_sort",
    "merge_sort",
    "heap_sort",
    "quick_sort",
    "parallel_merge_sort",
];

static ENGINE: LazyLock<Engine> = LazyLock::new(|| {
    let mut builder = EngineBuilder::new();
    quiver_algorithms::register_sorting::<i16>(&mut builder)
        .expect("standard sorts register once");
    builder.build()
});

fuzz_target!(|data: &[u8]| {
    let input: Vec<i16> = data
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let mut expected = input.clone();
    expected.sort();

    for name in SORTS {
        let success = ENGINE
            .run::<Vec<i16>, Vec<i16>>(Category::Sorting, name, input.clone())
            .unwrap_or_else(|e| panic!("{name} failed: {e}"));
        assert_eq!(success.output, expected, "{name} produced unsorted output");
    }
});
