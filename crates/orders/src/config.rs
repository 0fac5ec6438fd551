//! Business-rule thresholds.

use serde::{Deserialize, Serialize};

use orderflow_core::{DomainError, DomainResult};

pub const DEFAULT_HIGH_PRIORITY_THRESHOLD: f64 = 200.0;
pub const DEFAULT_HIGH_VALUE_ORDER_THRESHOLD: f64 = 150.0;
pub const DEFAULT_API_DATA_THRESHOLD: f64 = 50.0;
pub const DEFAULT_API_AMOUNT_THRESHOLD: f64 = 100.0;

/// Thresholds used by the priority calculator, the API strategy and exporters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Amount strictly above which an order is `High` priority.
    pub high_priority_threshold: f64,
    /// Amount strictly above which exports annotate the order as high value.
    pub high_value_order_threshold: f64,
    /// Minimum API payload value for the `processed` rule.
    pub api_data_threshold: f64,
    /// Amount strictly below which the API `processed` rule may apply.
    pub api_amount_threshold: f64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            high_priority_threshold: DEFAULT_HIGH_PRIORITY_THRESHOLD,
            high_value_order_threshold: DEFAULT_HIGH_VALUE_ORDER_THRESHOLD,
            api_data_threshold: DEFAULT_API_DATA_THRESHOLD,
            api_amount_threshold: DEFAULT_API_AMOUNT_THRESHOLD,
        }
    }
}

impl ProcessingConfig {
    pub fn validate(&self) -> DomainResult<()> {
        let fields = [
            ("high_priority_threshold", self.high_priority_threshold),
            ("high_value_order_threshold", self.high_value_order_threshold),
            ("api_data_threshold", self.api_data_threshold),
            ("api_amount_threshold", self.api_amount_threshold),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::validation(format!(
                    "{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }
        Ok(())
    }
}
