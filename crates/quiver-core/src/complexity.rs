//! Complexity classes and the ranker that orders them.
//!
//! A [`ComplexityRanker`] is a weight table `class → rank` where lower ranks
//! are preferred. Classes missing from the table rank at
//! [`ComplexityRanker::SENTINEL`], so they always sort last.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse asymptotic bucket for time or space usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ComplexityClass {
    /// `O(1)`
    Constant,
    /// `O(log n)`
    Logarithmic,
    /// `O(n)`
    Linear,
    /// `O(n log n)`
    Linearithmic,
    /// `O(n²)`
    Quadratic,
    /// `O(n³)`
    Cubic,
    /// `O(2ⁿ)`
    Exponential,
    /// `O(n!)`
    Factorial,
}

impl ComplexityClass {
    /// Every class, in ascending asymptotic order.
    pub const ALL: [ComplexityClass; 8] = [
        ComplexityClass::Constant,
        ComplexityClass::Logarithmic,
        ComplexityClass::Linear,
        ComplexityClass::Linearithmic,
        ComplexityClass::Quadratic,
        ComplexityClass::Cubic,
        ComplexityClass::Exponential,
        ComplexityClass::Factorial,
    ];

    /// Rough magnitude of this class at input size `n`, saturating at `u64::MAX`.
    ///
    /// Never returns zero, so a constant-space strategy still accounts for one unit.
    pub fn growth(self, n: u64) -> u64 {
        let log = u64::from(64 - n.leading_zeros()).max(1);
        let value = match self {
            ComplexityClass::Constant => 1,
            ComplexityClass::Logarithmic => log,
            ComplexityClass::Linear => n,
            ComplexityClass::Linearithmic => n.saturating_mul(log),
            ComplexityClass::Quadratic => n.saturating_mul(n),
            ComplexityClass::Cubic => n.saturating_mul(n).saturating_mul(n),
            ComplexityClass::Exponential => {
                if n >= 64 {
                    u64::MAX
                } else {
                    1u64 << n
                }
            }
            ComplexityClass::Factorial => (2..=n)
                .try_fold(1u64, |acc, k| acc.checked_mul(k))
                .unwrap_or(u64::MAX),
        };
        value.max(1)
    }

    /// The big-O spelling of this class.
    pub fn as_str(self) -> &'static str {
        match self {
            ComplexityClass::Constant => "O(1)",
            ComplexityClass::Logarithmic => "O(log n)",
            ComplexityClass::Linear => "O(n)",
            ComplexityClass::Linearithmic => "O(n log n)",
            ComplexityClass::Quadratic => "O(n²)",
            ComplexityClass::Cubic => "O(n³)",
            ComplexityClass::Exponential => "O(2ⁿ)",
            ComplexityClass::Factorial => "O(n!)",
        }
    }
}

impl fmt::Display for ComplexityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a recognised complexity class.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown complexity class: {0:?}")]
pub struct ParseComplexityError(pub String);

impl FromStr for ComplexityClass {
    type Err = ParseComplexityError;

    /// Accepts the Unicode spelling (`O(n²)`), ASCII variants (`O(n^2)`,
    /// `O(nlogn)`), and the bare inner expression (`n log n`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        let inner = compact
            .strip_prefix("o(")
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(&compact);

        let class = match inner {
            "1" | "const" | "constant" => ComplexityClass::Constant,
            "logn" | "log(n)" => ComplexityClass::Logarithmic,
            "n" | "linear" => ComplexityClass::Linear,
            "nlogn" | "nlog(n)" | "n*logn" => ComplexityClass::Linearithmic,
            "n²" | "n^2" | "n*n" => ComplexityClass::Quadratic,
            "n³" | "n^3" => ComplexityClass::Cubic,
            "2ⁿ" | "2^n" => ComplexityClass::Exponential,
            "n!" => ComplexityClass::Factorial,
            _ => return Err(ParseComplexityError(s.to_string())),
        };
        Ok(class)
    }
}

impl From<ComplexityClass> for String {
    fn from(class: ComplexityClass) -> Self {
        class.as_str().to_string()
    }
}

impl TryFrom<String> for ComplexityClass {
    type Error = ParseComplexityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Named weight-table presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankerPreset {
    /// `O(1) < O(log n) < O(n) < O(n log n) < O(n²) < O(n³) < O(2ⁿ)`.
    #[default]
    Standard,
    /// Logarithmic work is treated as good as constant work.
    FavorScalable,
    /// Linear work ranks ahead of logarithmic work: a plain scan beats a
    /// cleverer algorithm with preconditions.
    FavorSimple,
}

impl fmt::Display for RankerPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankerPreset::Standard => write!(f, "standard"),
            RankerPreset::FavorScalable => write!(f, "favor-scalable"),
            RankerPreset::FavorSimple => write!(f, "favor-simple"),
        }
    }
}

impl FromStr for RankerPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(RankerPreset::Standard),
            "favor-scalable" => Ok(RankerPreset::FavorScalable),
            "favor-simple" => Ok(RankerPreset::FavorSimple),
            other => Err(format!("unknown ranker preset: {other:?}")),
        }
    }
}

/// Total ordering over complexity classes, driven by a weight table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexityRanker {
    preset: RankerPreset,
    weights: HashMap<ComplexityClass, u32>,
}

impl ComplexityRanker {
    /// Rank given to classes absent from the weight table.
    pub const SENTINEL: u32 = u32::MAX;

    /// Create a ranker from a named preset.
    pub fn new(preset: RankerPreset) -> Self {
        use ComplexityClass::*;

        let table: &[(ComplexityClass, u32)] = match preset {
            RankerPreset::Standard => &[
                (Constant, 0),
                (Logarithmic, 1),
                (Linear, 2),
                (Linearithmic, 3),
                (Quadratic, 4),
                (Cubic, 5),
                (Exponential, 6),
            ],
            RankerPreset::FavorScalable => &[
                (Constant, 0),
                (Logarithmic, 0),
                (Linear, 2),
                (Linearithmic, 3),
                (Quadratic, 4),
                (Cubic, 5),
                (Exponential, 6),
            ],
            RankerPreset::FavorSimple => &[
                (Constant, 0),
                (Linear, 1),
                (Logarithmic, 2),
                (Linearithmic, 3),
                (Quadratic, 4),
                (Cubic, 5),
                (Exponential, 6),
            ],
        };

        Self {
            preset,
            weights: table.iter().copied().collect(),
        }
    }

    /// Builder: override the rank of a single class.
    pub fn with_weight(mut self, class: ComplexityClass, rank: u32) -> Self {
        self.weights.insert(class, rank);
        self
    }

    /// Builder: remove a class from the table so it ranks at the sentinel.
    pub fn without(mut self, class: ComplexityClass) -> Self {
        self.weights.remove(&class);
        self
    }

    /// The preset this ranker was built from.
    pub fn preset(&self) -> RankerPreset {
        self.preset
    }

    /// Rank of `class`; lower is preferred.
    pub fn rank(&self, class: ComplexityClass) -> u32 {
        self.weights.get(&class).copied().unwrap_or(Self::SENTINEL)
    }

    /// Compare two classes by rank.
    pub fn compare(&self, a: ComplexityClass, b: ComplexityClass) -> Ordering {
        self.rank(a).cmp(&self.rank(b))
    }

    /// Whether `class` ranks no worse than `threshold`.
    pub fn within(&self, class: ComplexityClass, threshold: ComplexityClass) -> bool {
        self.compare(class, threshold) != Ordering::Greater
    }
}

impl Default for ComplexityRanker {
    fn default() -> Self {
        Self::new(RankerPreset::Standard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ComplexityClass::*;

    #[test]
    fn test_standard_order_is_ascending() {
        let ranker = ComplexityRanker::default();
        let ordered = [
            Constant,
            Logarithmic,
            Linear,
            Linearithmic,
            Quadratic,
            Cubic,
            Exponential,
        ];
        for pair in ordered.windows(2) {
            assert_eq!(ranker.compare(pair[0], pair[1]), Ordering::Less);
        }
    }

    #[test]
    fn test_unknown_class_ranks_last() {
        let ranker = ComplexityRanker::default();
        assert_eq!(ranker.rank(Factorial), ComplexityRanker::SENTINEL);
        assert_eq!(ranker.compare(Exponential, Factorial), Ordering::Less);

        let trimmed = ComplexityRanker::default().without(Linear);
        assert_eq!(trimmed.compare(Cubic, Linear), Ordering::Less);
    }

    #[test]
    fn test_favor_simple_puts_linear_before_logarithmic() {
        let ranker = ComplexityRanker::new(RankerPreset::FavorSimple);
        assert_eq!(ranker.compare(Linear, Logarithmic), Ordering::Less);
        assert_eq!(ranker.compare(Logarithmic, Linearithmic), Ordering::Less);
    }

    #[test]
    fn test_favor_scalable_ties_log_with_constant() {
        let ranker = ComplexityRanker::new(RankerPreset::FavorScalable);
        assert_eq!(ranker.compare(Logarithmic, Constant), Ordering::Equal);
        assert_eq!(ranker.compare(Logarithmic, Linear), Ordering::Less);
    }

    #[test]
    fn test_with_weight_overrides_preset() {
        let ranker = ComplexityRanker::default().with_weight(Quadratic, 0);
        assert_eq!(ranker.compare(Quadratic, Linearithmic), Ordering::Less);
        assert_eq!(ranker.compare(Quadratic, Constant), Ordering::Equal);
    }

    #[test]
    fn test_within_threshold() {
        let ranker = ComplexityRanker::default();
        assert!(ranker.within(Linear, Linearithmic));
        assert!(ranker.within(Linearithmic, Linearithmic));
        assert!(!ranker.within(Quadratic, Linearithmic));
        assert!(!ranker.within(Factorial, Exponential));
    }

    #[test]
    fn test_parse_spellings() {
        assert_eq!("O(1)".parse::<ComplexityClass>().unwrap(), Constant);
        assert_eq!("O(log n)".parse::<ComplexityClass>().unwrap(), Logarithmic);
        assert_eq!("o(N)".parse::<ComplexityClass>().unwrap(), Linear);
        assert_eq!("O(n log n)".parse::<ComplexityClass>().unwrap(), Linearithmic);
        assert_eq!("nlogn".parse::<ComplexityClass>().unwrap(), Linearithmic);
        assert_eq!("O(n^2)".parse::<ComplexityClass>().unwrap(), Quadratic);
        assert_eq!("O(n²)".parse::<ComplexityClass>().unwrap(), Quadratic);
        assert_eq!("O(2^n)".parse::<ComplexityClass>().unwrap(), Exponential);
        assert_eq!("O(n!)".parse::<ComplexityClass>().unwrap(), Factorial);
        assert!("O(n^4)".parse::<ComplexityClass>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for class in ComplexityClass::ALL {
            assert_eq!(class.to_string().parse::<ComplexityClass>().unwrap(), class);
        }
    }

    #[test]
    fn test_growth_saturates() {
        assert_eq!(Constant.growth(1_000_000), 1);
        assert_eq!(Linear.growth(10_000), 10_000);
        assert_eq!(Logarithmic.growth(1024), 11);
        assert_eq!(Quadratic.growth(u64::MAX), u64::MAX);
        assert_eq!(Exponential.growth(100), u64::MAX);
        assert_eq!(Factorial.growth(5), 120);
        assert_eq!(Factorial.growth(30), u64::MAX);
        assert_eq!(Linear.growth(0), 1);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("standard".parse::<RankerPreset>().unwrap(), RankerPreset::Standard);
        assert_eq!(
            "favor-simple".parse::<RankerPreset>().unwrap(),
            RankerPreset::FavorSimple
        );
        assert!("fastest".parse::<RankerPreset>().is_err());
        assert_eq!(RankerPreset::FavorScalable.to_string(), "favor-scalable");
    }
}
