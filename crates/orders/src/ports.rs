//! Collaborator contracts consumed by the processing core.
//!
//! Each trait is a blocking call that either returns or fails before the next
//! order is processed. Implementations live in infrastructure crates; tests use
//! the generated mocks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use orderflow_core::{OrderId, UserId};

use crate::order::{Order, Outcome};
use crate::priority::Priority;

/// Fetching a user's orders failed; the whole batch is abandoned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("order source unavailable: {0}")]
    Unavailable(String),
}

/// Persisting an order's outcome failed (as opposed to the store answering `false`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("order store lock poisoned")]
    Poisoned,

    #[error("order {0} is already stored")]
    Duplicate(OrderId),
}

/// The API call itself failed (transport, timeout, ...). Maps to `api_failure`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("api call failed: {0}")]
pub struct ApiCallError(pub String);

/// Exporting an order failed. Maps to `export_failed`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("can not export csv: {0}")]
    Io(String),
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        ExportError::Io(value.to_string())
    }
}

/// Response returned by the external API for one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub data: f64,
}

impl ApiResponse {
    pub fn new(status: impl Into<String>, data: f64) -> Self {
        Self {
            status: status.into(),
            data,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait OrderSource: Send + Sync {
    /// All orders belonging to `user_id` (possibly none).
    fn get_orders(&self, user_id: UserId) -> Result<Vec<Order>, SourceError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait OrderStore: Send + Sync {
    /// Persist the processing result. `Ok(false)` means the store declined the write.
    fn update(
        &self,
        order_id: OrderId,
        outcome: Outcome,
        priority: Priority,
    ) -> Result<bool, StoreError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ApiClient: Send + Sync {
    fn call(&self, order_id: OrderId) -> Result<ApiResponse, ApiCallError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait FileExporter: Send + Sync {
    fn export(&self, order: &Order, user_id: UserId) -> Result<(), ExportError>;
}
