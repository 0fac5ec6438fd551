//! Order processing orchestration.
//!
//! ```text
//! get_orders(user)
//!   ↓ (empty or failed → batch fails)
//! for each order:
//!   select strategy → process → outcome
//!   priority from amount
//!   store.update(id, outcome, priority)   (false / fault → db_error, batch fails)
//! ```
//!
//! Per-order failures never abort the loop; every fetched order is processed
//! and written.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use orderflow_core::{OrderId, UserId};

use crate::config::ProcessingConfig;
use crate::order::{Order, OrderError, Outcome};
use crate::ports::{ApiClient, FileExporter, OrderSource, OrderStore, SourceError};
use crate::priority::PriorityCalculator;
use crate::selector::ProcessorSelector;

/// Why a batch produced no processed orders at all.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("failed to fetch orders: {0}")]
    Source(#[from] SourceError),

    /// Nothing to do is reported as a failure.
    #[error("no orders found for user {0}")]
    NoOrders(UserId),
}

/// Processed orders of one batch plus the ids whose write-back failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub user_id: UserId,
    pub orders: Vec<Order>,
    pub failed_writes: Vec<OrderId>,
}

impl BatchReport {
    /// True iff every order in the batch was persisted.
    pub fn is_success(&self) -> bool {
        self.failed_writes.is_empty()
    }
}

pub struct OrderProcessingService {
    source: Arc<dyn OrderSource>,
    store: Arc<dyn OrderStore>,
    api_client: Arc<dyn ApiClient>,
    exporter: Arc<dyn FileExporter>,
    config: ProcessingConfig,
    priority: PriorityCalculator,
}

impl OrderProcessingService {
    pub fn new(
        source: Arc<dyn OrderSource>,
        store: Arc<dyn OrderStore>,
        api_client: Arc<dyn ApiClient>,
        exporter: Arc<dyn FileExporter>,
    ) -> Self {
        let config = ProcessingConfig::default();
        Self {
            source,
            store,
            api_client,
            exporter,
            priority: PriorityCalculator::new(config.high_priority_threshold),
            config,
        }
    }

    pub fn with_config(mut self, config: ProcessingConfig) -> Self {
        self.priority = PriorityCalculator::new(config.high_priority_threshold);
        self.config = config;
        self
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// Process every order of `user_id`; true only if all of them were persisted.
    ///
    /// A failed fetch and an empty order list both yield `false` and are not
    /// distinguishable from the return value (see [`Self::process_batch`]).
    /// Orders whose write was refused are `db_error` only in the batch report;
    /// callers that show final statuses should use [`Self::process_batch`].
    pub fn process_orders(&self, user_id: UserId) -> bool {
        match self.process_batch(user_id) {
            Ok(report) => report.is_success(),
            Err(err) => {
                tracing::warn!(%user_id, error = %err, "order batch not processed");
                false
            }
        }
    }

    /// Same algorithm as [`Self::process_orders`], returning the processed orders.
    pub fn process_batch(&self, user_id: UserId) -> Result<BatchReport, BatchError> {
        let span = tracing::info_span!("process_orders", %user_id);
        let _enter = span.enter();

        let mut orders = self.source.get_orders(user_id)?;
        if orders.is_empty() {
            return Err(BatchError::NoOrders(user_id));
        }

        let mut failed_writes = Vec::new();
        for order in orders.iter_mut() {
            if !self.process_order(order, user_id) {
                failed_writes.push(order.id());
            }
        }

        tracing::info!(
            total = orders.len(),
            failed_writes = failed_writes.len(),
            "order batch processed"
        );

        Ok(BatchReport {
            user_id,
            orders,
            failed_writes,
        })
    }

    /// Run one order through strategy, priority and persistence, updating it in place.
    ///
    /// Returns whether the write-back succeeded. On failure the order's outcome
    /// becomes `db_error`; its priority is kept.
    pub fn process_order(&self, order: &mut Order, user_id: UserId) -> bool {
        let selector = ProcessorSelector::new(
            self.exporter.as_ref(),
            self.api_client.as_ref(),
            self.config,
        );
        let processor = selector.select(order, user_id);

        let outcome = Outcome::from(processor.process(order));
        order.set_outcome(outcome);
        let priority = self.priority.determine_priority(order.amount());
        order.set_priority(priority);

        tracing::debug!(
            order_id = %order.id(),
            category = %order.category(),
            processor = processor.name(),
            outcome = %outcome,
            priority = %order.priority(),
            "order processed"
        );

        match self.store.update(order.id(), outcome, order.priority()) {
            Ok(true) => true,
            Ok(false) => {
                tracing::warn!(order_id = %order.id(), "order store rejected update");
                order.set_outcome(OrderError::DbError);
                false
            }
            Err(err) => {
                tracing::warn!(order_id = %order.id(), error = %err, "order store update failed");
                order.set_outcome(OrderError::DbError);
                false
            }
        }
    }
}
