//! Substring search: every (possibly overlapping) occurrence of a pattern.
//!
//! Offsets are byte offsets into `text`. An empty pattern matches nowhere.

use quiver_core::{AlgoMetadata, ComplexityClass, SelectorHint, Strategy, StrategyError};

/// Input of the string-processing signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringInput {
    pub text: String,
    pub pattern: String,
}

impl SubstringInput {
    pub fn new(text: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pattern: pattern.into(),
        }
    }
}

/// Compares the pattern at every offset.
pub struct NaiveSubstring {
    meta: AlgoMetadata,
}

impl NaiveSubstring {
    pub fn new() -> Self {
        Self {
            meta: AlgoMetadata::new("naive_substring", ComplexityClass::Quadratic)
                .with_description("Tries the pattern at every offset"),
        }
    }
}

impl Default for NaiveSubstring {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy<SubstringInput, Vec<usize>> for NaiveSubstring {
    fn metadata(&self) -> &AlgoMetadata {
        &self.meta
    }

    fn can_apply(
        &self,
        _input: &SubstringInput,
        _hint: &SelectorHint,
    ) -> Result<bool, StrategyError> {
        Ok(true)
    }

    fn execute(&self, input: SubstringInput) -> Result<Vec<usize>, StrategyError> {
        let pattern = input.pattern.as_bytes();
        if pattern.is_empty() {
            return Ok(Vec::new());
        }
        Ok(input
            .text
            .as_bytes()
            .windows(pattern.len())
            .enumerate()
            .filter(|(_, window)| *window == pattern)
            .map(|(offset, _)| offset)
            .collect())
    }
}

/// Knuth–Morris–Pratt: linear time after a linear-size prefix table.
pub struct KmpSubstring {
    meta: AlgoMetadata,
}

impl KmpSubstring {
    pub fn new() -> Self {
        Self {
            meta: AlgoMetadata::new("kmp_substring", ComplexityClass::Linear)
                .with_space(ComplexityClass::Linear)
                .with_description("Knuth-Morris-Pratt with a failure table"),
        }
    }
}

impl Default for KmpSubstring {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy<SubstringInput, Vec<usize>> for KmpSubstring {
    fn metadata(&self) -> &AlgoMetadata {
        &self.meta
    }

    fn can_apply(
        &self,
        input: &SubstringInput,
        _hint: &SelectorHint,
    ) -> Result<bool, StrategyError> {
        Ok(!input.pattern.is_empty())
    }

    fn execute(&self, input: SubstringInput) -> Result<Vec<usize>, StrategyError> {
        let pattern = input.pattern.as_bytes();
        if pattern.is_empty() {
            return Ok(Vec::new());
        }
        let failure = failure_table(pattern);

        let mut matches = Vec::new();
        let mut matched = 0;
        for (i, &byte) in input.text.as_bytes().iter().enumerate() {
            while matched > 0 && pattern[matched] != byte {
                matched = failure[matched - 1];
            }
            if pattern[matched] == byte {
                matched += 1;
            }
            if matched == pattern.len() {
                matches.push(i + 1 - pattern.len());
                matched = failure[matched - 1];
            }
        }
        Ok(matches)
    }
}

/// `table[i]` is the length of the longest proper prefix of
/// `pattern[..=i]` that is also a suffix of it.
fn failure_table(pattern: &[u8]) -> Vec<usize> {
    let mut table = vec![0; pattern.len()];
    let mut len = 0;
    for i in 1..pattern.len() {
        while len > 0 && pattern[i] != pattern[len] {
            len = table[len - 1];
        }
        if pattern[i] == pattern[len] {
            len += 1;
        }
        table[i] = len;
    }
    table
}
