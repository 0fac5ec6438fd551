use serde::{Deserialize, Serialize};

use orderflow_core::{DomainError, DomainResult, OrderId};

use crate::priority::Priority;

/// Order kind driving strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderCategory {
    #[serde(rename = "A")]
    Export,
    #[serde(rename = "B")]
    Api,
    #[serde(rename = "C")]
    Simple,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl OrderCategory {
    /// Short code used in exports and external feeds.
    pub fn code(self) -> &'static str {
        match self {
            OrderCategory::Export => "A",
            OrderCategory::Api => "B",
            OrderCategory::Simple => "C",
            OrderCategory::Unknown => "UNKNOWN",
        }
    }

    /// Total parse: anything that is not a recognised code is `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "A" => OrderCategory::Export,
            "B" => OrderCategory::Api,
            "C" => OrderCategory::Simple,
            _ => OrderCategory::Unknown,
        }
    }
}

impl core::fmt::Display for OrderCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

/// Terminal (or initial) processing status.
///
/// `Error` is a *status*, not an [`OrderError`]: the API strategy uses it for
/// responses that pass the success gate but match no other rule, and it is
/// persisted like any other status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    Exported,
    Processed,
    Pending,
    Completed,
    InProgress,
    Error,
}

impl OrderStatus {
    pub fn code(self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Exported => "exported",
            OrderStatus::Processed => "processed",
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Error => "error",
        }
    }
}

/// Per-order failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderError {
    ExportFailed,
    ApiError,
    ApiFailure,
    DbError,
    UnknownType,
}

impl OrderError {
    pub fn code(self) -> &'static str {
        match self {
            OrderError::ExportFailed => "export_failed",
            OrderError::ApiError => "api_error",
            OrderError::ApiFailure => "api_failure",
            OrderError::DbError => "db_error",
            OrderError::UnknownType => "unknown_type",
        }
    }
}

/// Result of processing one order: a success status or a failure, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Status(OrderStatus),
    Error(OrderError),
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Status(_))
    }

    pub fn code(self) -> &'static str {
        match self {
            Outcome::Status(s) => s.code(),
            Outcome::Error(e) => e.code(),
        }
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Outcome::Status(OrderStatus::New)
    }
}

impl From<OrderStatus> for Outcome {
    fn from(value: OrderStatus) -> Self {
        Outcome::Status(value)
    }
}

impl From<OrderError> for Outcome {
    fn from(value: OrderError) -> Self {
        Outcome::Error(value)
    }
}

impl From<Result<OrderStatus, OrderError>> for Outcome {
    fn from(value: Result<OrderStatus, OrderError>) -> Self {
        match value {
            Ok(status) => Outcome::Status(status),
            Err(error) => Outcome::Error(error),
        }
    }
}

impl core::fmt::Display for Outcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

/// An order owned by the caller (or the store it was fetched from).
///
/// Identity, category, amount and flag are fixed at construction; outcome and
/// priority are rewritten by each processing pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    category: OrderCategory,
    amount: f64,
    flag: bool,
    outcome: Outcome,
    priority: Priority,
}

impl Order {
    /// Create a fresh order (`new` outcome, `low` priority).
    pub fn new(
        id: OrderId,
        category: OrderCategory,
        amount: f64,
        flag: bool,
    ) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::validation("amount must be a finite number"));
        }
        if amount < 0.0 {
            return Err(DomainError::validation("amount must not be negative"));
        }

        Ok(Self {
            id,
            category,
            amount,
            flag,
            outcome: Outcome::default(),
            priority: Priority::Low,
        })
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn category(&self) -> OrderCategory {
        self.category
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn flag(&self) -> bool {
        self.flag
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn set_outcome(&mut self, outcome: impl Into<Outcome>) {
        self.outcome = outcome.into();
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_order_starts_as_new_and_low() {
        let id = OrderId::new(1);
        let order = Order::new(id, OrderCategory::Simple, 10.0, true).unwrap();
        assert_eq!(order.outcome(), Outcome::Status(OrderStatus::New));
        assert_eq!(order.priority(), Priority::Low);
        assert!(order.flag());
    }

    #[test]
    fn rejects_negative_and_non_finite_amounts() {
        let api_order = |amount| Order::new(OrderId::new(1), OrderCategory::Api, amount, false);

        let err = api_order(-0.01).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("negative") => {}
            other => panic!("Expected Validation for negative amount, got {other:?}"),
        }

        assert!(api_order(f64::NAN).is_err());
        assert!(api_order(f64::INFINITY).is_err());
        assert!(api_order(0.0).is_ok());
    }

    #[test]
    fn unrecognised_category_codes_map_to_unknown() {
        assert_eq!(OrderCategory::from_code("A"), OrderCategory::Export);
        assert_eq!(OrderCategory::from_code("B"), OrderCategory::Api);
        assert_eq!(OrderCategory::from_code("C"), OrderCategory::Simple);
        assert_eq!(OrderCategory::from_code("UNKNOWN"), OrderCategory::Unknown);
        assert_eq!(OrderCategory::from_code("Z"), OrderCategory::Unknown);
        assert_eq!(OrderCategory::from_code(""), OrderCategory::Unknown);
    }

    #[test]
    fn outcome_success_predicate_follows_the_tag() {
        assert!(Outcome::Status(OrderStatus::Exported).is_success());
        // The terminal `error` status is still a status.
        assert!(Outcome::Status(OrderStatus::Error).is_success());
        assert!(!Outcome::Error(OrderError::DbError).is_success());
    }

    #[test]
    fn outcome_serializes_as_its_code() {
        let in_progress = Outcome::Status(OrderStatus::InProgress);
        let json = serde_json::to_string(&in_progress).unwrap();
        assert_eq!(json, "\"in_progress\"");

        let api_failure = Outcome::Error(OrderError::ApiFailure);
        let json = serde_json::to_string(&api_failure).unwrap();
        assert_eq!(json, "\"api_failure\"");

        let back: Outcome = serde_json::from_str("\"export_failed\"").unwrap();
        assert_eq!(back, Outcome::Error(OrderError::ExportFailed));

        let back: Outcome = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(back, Outcome::Status(OrderStatus::Error));
    }

    #[test]
    fn strategy_results_convert_into_outcomes() {
        let ok: Result<OrderStatus, OrderError> = Ok(OrderStatus::Pending);
        let err: Result<OrderStatus, OrderError> = Err(OrderError::UnknownType);
        assert_eq!(Outcome::from(ok), Outcome::Status(OrderStatus::Pending));
        assert_eq!(Outcome::from(err), Outcome::Error(OrderError::UnknownType));
        assert_eq!(Outcome::from(err).to_string(), "unknown_type");
    }
}
