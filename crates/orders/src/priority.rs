//! Priority tiers derived from order amount.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_HIGH_PRIORITY_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    High,
}

impl Priority {
    pub fn code(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::High => "high",
        }
    }
}

impl core::fmt::Display for Priority {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

/// Maps an amount to a priority tier.
///
/// Amounts strictly above the threshold are `High`; the threshold itself is `Low`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityCalculator {
    high_priority_threshold: f64,
}

impl PriorityCalculator {
    pub fn new(high_priority_threshold: f64) -> Self {
        Self {
            high_priority_threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.high_priority_threshold
    }

    pub fn determine_priority(&self, amount: f64) -> Priority {
        if amount > self.high_priority_threshold {
            Priority::High
        } else {
            Priority::Low
        }
    }
}

impl Default for PriorityCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_PRIORITY_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn threshold_itself_is_low() {
        let calc = PriorityCalculator::default();
        assert_eq!(calc.determine_priority(200.0), Priority::Low);
        assert_eq!(calc.determine_priority(200.01), Priority::High);
        assert_eq!(calc.determine_priority(0.0), Priority::Low);
    }

    #[test]
    fn custom_threshold_is_honoured() {
        let calc = PriorityCalculator::new(10.0);
        assert_eq!(calc.determine_priority(10.0), Priority::Low);
        assert_eq!(calc.determine_priority(10.5), Priority::High);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: amounts up to and including the threshold are Low.
        #[test]
        fn at_or_below_threshold_is_low(amount in 0.0f64..=200.0f64) {
            prop_assert_eq!(
                PriorityCalculator::default().determine_priority(amount),
                Priority::Low
            );
        }

        /// Property: anything strictly above the threshold is High.
        #[test]
        fn above_threshold_is_high(delta in 1e-9f64..1_000_000.0f64) {
            prop_assert_eq!(
                PriorityCalculator::default().determine_priority(200.0 + delta),
                Priority::High
            );
        }
    }
}
