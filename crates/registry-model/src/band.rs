//! Mark severity bands

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity band of a mark value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkBand {
    /// Below 50
    Poor,
    /// 50 to 69
    Warning,
    /// 70 to 89
    Good,
    /// 90 and above
    Excellent,
}

impl MarkBand {
    /// Classify a mark value
    ///
    /// Total over all integers: values above 100 are `Excellent`, negative
    /// values are `Poor`.
    #[must_use]
    pub const fn classify(value: i32) -> Self {
        if value >= 90 {
            Self::Excellent
        } else if value >= 70 {
            Self::Good
        } else if value >= 50 {
            Self::Warning
        } else {
            Self::Poor
        }
    }

    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Poor => "poor",
        }
    }
}

impl fmt::Display for MarkBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn classification_thresholds() {
        assert_eq!(MarkBand::classify(95).as_str(), "excellent");
        assert_eq!(MarkBand::classify(90).as_str(), "excellent");
        assert_eq!(MarkBand::classify(89).as_str(), "good");
        assert_eq!(MarkBand::classify(70).as_str(), "good");
        assert_eq!(MarkBand::classify(69).as_str(), "warning");
        assert_eq!(MarkBand::classify(50).as_str(), "warning");
        assert_eq!(MarkBand::classify(49).as_str(), "poor");
        assert_eq!(MarkBand::classify(10).as_str(), "poor");
    }

    #[test]
    fn out_of_range_values_fall_to_nearest_band() {
        assert_eq!(MarkBand::classify(-5), MarkBand::Poor);
        assert_eq!(MarkBand::classify(150), MarkBand::Excellent);
        assert_eq!(MarkBand::classify(i32::MIN), MarkBand::Poor);
        assert_eq!(MarkBand::classify(i32::MAX), MarkBand::Excellent);
    }

    proptest! {
        #[test]
        fn prop_classification_is_monotonic(a in any::<i32>(), b in any::<i32>()) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(MarkBand::classify(lo) <= MarkBand::classify(hi));
        }
    }
}
