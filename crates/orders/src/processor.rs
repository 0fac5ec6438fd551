//! Outcome strategies, one per order category.

use orderflow_core::UserId;

use crate::config::{DEFAULT_API_AMOUNT_THRESHOLD, DEFAULT_API_DATA_THRESHOLD};
use crate::order::{Order, OrderError, OrderStatus};
use crate::ports::{ApiClient, ApiResponse, FileExporter};

/// Decides the outcome of a single order.
///
/// Strategies may call external collaborators and may touch the order (the
/// export strategy records its tentative status before exporting), but the
/// final outcome is returned, not stored: the orchestrator owns that write.
pub trait OrderProcessor {
    fn name(&self) -> &'static str;

    fn process(&self, order: &mut Order) -> Result<OrderStatus, OrderError>;
}

/// Export orders: hand the order to the file exporter on behalf of a user.
pub struct ExportOrderProcessor<'a> {
    exporter: &'a dyn FileExporter,
    user_id: UserId,
}

impl<'a> ExportOrderProcessor<'a> {
    pub fn new(exporter: &'a dyn FileExporter, user_id: UserId) -> Self {
        Self { exporter, user_id }
    }
}

impl OrderProcessor for ExportOrderProcessor<'_> {
    fn name(&self) -> &'static str {
        "export"
    }

    fn process(&self, order: &mut Order) -> Result<OrderStatus, OrderError> {
        // The exported record carries the status it is being exported under.
        order.set_outcome(OrderStatus::Exported);

        match self.exporter.export(order, self.user_id) {
            Ok(()) => Ok(OrderStatus::Exported),
            Err(err) => {
                tracing::warn!(
                    order_id = %order.id(),
                    user_id = %self.user_id,
                    error = %err,
                    "order export failed"
                );
                Err(OrderError::ExportFailed)
            }
        }
    }
}

/// API-driven orders: the external API's answer decides the status.
pub struct ApiOrderProcessor<'a> {
    client: &'a dyn ApiClient,
    data_threshold: f64,
    amount_threshold: f64,
}

impl<'a> ApiOrderProcessor<'a> {
    pub fn new(client: &'a dyn ApiClient) -> Self {
        Self {
            client,
            data_threshold: DEFAULT_API_DATA_THRESHOLD,
            amount_threshold: DEFAULT_API_AMOUNT_THRESHOLD,
        }
    }

    pub fn with_thresholds(mut self, data_threshold: f64, amount_threshold: f64) -> Self {
        self.data_threshold = data_threshold;
        self.amount_threshold = amount_threshold;
        self
    }

    /// Evaluate an API response against the order.
    ///
    /// Rules, first match wins:
    /// 1. response not `success` → `api_error`
    /// 2. data ≥ data threshold and amount < amount threshold → `processed`
    /// 3. data < data threshold or flag set → `pending`
    /// 4. otherwise the terminal `error` *status*
    pub fn determine_status(
        &self,
        response: &ApiResponse,
        order: &Order,
    ) -> Result<OrderStatus, OrderError> {
        if !response.is_success() {
            return Err(OrderError::ApiError);
        }

        if response.data >= self.data_threshold && order.amount() < self.amount_threshold {
            Ok(OrderStatus::Processed)
        } else if response.data < self.data_threshold || order.flag() {
            Ok(OrderStatus::Pending)
        } else {
            Ok(OrderStatus::Error)
        }
    }
}

impl OrderProcessor for ApiOrderProcessor<'_> {
    fn name(&self) -> &'static str {
        "api"
    }

    fn process(&self, order: &mut Order) -> Result<OrderStatus, OrderError> {
        match self.client.call(order.id()) {
            Ok(response) => self.determine_status(&response, order),
            Err(err) => {
                tracing::warn!(order_id = %order.id(), error = %err, "api call failed");
                Err(OrderError::ApiFailure)
            }
        }
    }
}

/// Simple orders: the flag alone decides.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleOrderProcessor;

impl OrderProcessor for SimpleOrderProcessor {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn process(&self, order: &mut Order) -> Result<OrderStatus, OrderError> {
        if order.flag() {
            Ok(OrderStatus::Completed)
        } else {
            Ok(OrderStatus::InProgress)
        }
    }
}

/// Fallback for categories without a strategy.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnknownOrderProcessor;

impl OrderProcessor for UnknownOrderProcessor {
    fn name(&self) -> &'static str {
        "unknown"
    }

    fn process(&self, _order: &mut Order) -> Result<OrderStatus, OrderError> {
        Err(OrderError::UnknownType)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use orderflow_core::OrderId;
    use proptest::prelude::*;

    use crate::order::{OrderCategory, Outcome};
    use crate::ports::{ApiCallError, ExportError, MockApiClient, MockFileExporter};

    fn order(id: u64, category: OrderCategory, amount: f64, flag: bool) -> Order {
        Order::new(id.into(), category, amount, flag).unwrap()
    }

    fn unused_api_client() -> MockApiClient {
        MockApiClient::new()
    }

    #[test]
    fn export_success_marks_order_exported_before_exporting() {
        let mut exporter = MockFileExporter::new();
        exporter
            .expect_export()
            .withf(|order, user_id| {
                order.id() == OrderId::new(1)
                    && order.outcome() == Outcome::Status(OrderStatus::Exported)
                    && *user_id == UserId::new(1)
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let processor = ExportOrderProcessor::new(&exporter, UserId::new(1));
        let mut o = order(1, OrderCategory::Export, 100.0, true);

        assert_eq!(processor.process(&mut o), Ok(OrderStatus::Exported));
        assert_eq!(o.outcome(), Outcome::Status(OrderStatus::Exported));
    }

    #[test]
    fn export_failure_maps_to_export_failed() {
        let mut exporter = MockFileExporter::new();
        exporter
            .expect_export()
            .times(1)
            .returning(|_, _| Err(ExportError::Io("disk full".to_string())));

        let processor = ExportOrderProcessor::new(&exporter, UserId::new(1));
        let mut o = order(1, OrderCategory::Export, 100.0, true);

        assert_eq!(processor.process(&mut o), Err(OrderError::ExportFailed));
    }

    #[test]
    fn api_rejected_response_is_api_error() {
        let mut client = MockApiClient::new();
        client
            .expect_call()
            .with(eq(OrderId::new(2)))
            .times(1)
            .returning(|_| Ok(ApiResponse::new("failed", 100.0)));

        let processor = ApiOrderProcessor::new(&client);
        let mut o = order(2, OrderCategory::Api, 10.0, true);

        assert_eq!(processor.process(&mut o), Err(OrderError::ApiError));
    }

    #[test]
    fn api_call_fault_is_api_failure() {
        let mut client = MockApiClient::new();
        client
            .expect_call()
            .times(1)
            .returning(|_| Err(ApiCallError("connection reset".to_string())));

        let processor = ApiOrderProcessor::new(&client);
        let mut o = order(2, OrderCategory::Api, 10.0, false);

        assert_eq!(processor.process(&mut o), Err(OrderError::ApiFailure));
        // The strategy never writes the outcome itself.
        assert_eq!(o.outcome(), Outcome::Status(OrderStatus::New));
    }

    fn api_status(
        processor: &ApiOrderProcessor<'_>,
        data: f64,
        amount: f64,
        flag: bool,
    ) -> Result<OrderStatus, OrderError> {
        let o = order(1, OrderCategory::Api, amount, flag);
        let response = ApiResponse::new("success", data);
        processor.determine_status(&response, &o)
    }

    #[test]
    fn api_rules_cover_every_branch() {
        let client = unused_api_client();
        let p = ApiOrderProcessor::new(&client);
        let processed = Ok(OrderStatus::Processed);

        assert_eq!(api_status(&p, 50.0, 99.0, false), processed);
        assert_eq!(api_status(&p, 49.0, 150.0, false), Ok(OrderStatus::Pending));
        assert_eq!(api_status(&p, 60.0, 150.0, true), Ok(OrderStatus::Pending));
        assert_eq!(api_status(&p, 60.0, 100.0, false), Ok(OrderStatus::Error));
    }

    #[test]
    fn low_data_is_pending_even_when_amount_is_below_threshold() {
        let client = unused_api_client();
        let p = ApiOrderProcessor::new(&client);

        // Amount qualifies for processed, data does not.
        assert_eq!(api_status(&p, 49.0, 99.0, false), Ok(OrderStatus::Pending));
        assert_eq!(api_status(&p, 0.0, 0.0, false), Ok(OrderStatus::Pending));
    }

    #[test]
    fn api_thresholds_are_configurable() {
        let client = unused_api_client();
        let p = ApiOrderProcessor::new(&client).with_thresholds(10.0, 1e3);
        let processed = Ok(OrderStatus::Processed);

        assert_eq!(api_status(&p, 10.0, 500.0, false), processed);
    }

    #[test]
    fn simple_and_unknown_strategies() {
        let mut completed = order(3, OrderCategory::Simple, 300.0, true);
        let mut in_progress = order(3, OrderCategory::Simple, 300.0, false);
        let mut unknown = order(4, OrderCategory::Unknown, 50.0, true);

        assert_eq!(
            SimpleOrderProcessor.process(&mut completed),
            Ok(OrderStatus::Completed)
        );
        assert_eq!(
            SimpleOrderProcessor.process(&mut in_progress),
            Ok(OrderStatus::InProgress)
        );
        assert_eq!(
            UnknownOrderProcessor.process(&mut unknown),
            Err(OrderError::UnknownType)
        );
    }

    proptest! {
        /// Property: a non-success response is `api_error` whatever the data and flag.
        #[test]
        fn rejected_response_wins_over_every_other_rule(
            data in 0.0f64..1_000.0,
            amount in 0.0f64..1_000.0,
            flag in any::<bool>(),
        ) {
            let client = unused_api_client();
            let processor = ApiOrderProcessor::new(&client);
            let o = order(1, OrderCategory::Api, amount, flag);
            prop_assert_eq!(
                processor.determine_status(&ApiResponse::new("failed", data), &o),
                Err(OrderError::ApiError)
            );
        }

        /// Property: the processed rule is checked before the pending rule.
        #[test]
        fn processed_takes_precedence_over_flag(
            data in 50.0f64..1_000.0,
            amount in 0.0f64..99.99,
        ) {
            let client = unused_api_client();
            let processor = ApiOrderProcessor::new(&client);
            let o = order(1, OrderCategory::Api, amount, true);
            prop_assert_eq!(
                processor.determine_status(&ApiResponse::new("success", data), &o),
                Ok(OrderStatus::Processed)
            );
        }

        /// Property: the simple strategy ignores the amount.
        #[test]
        fn simple_strategy_ignores_amount(amount in 0.0f64..1_000_000.0, flag in any::<bool>()) {
            let mut o = order(1, OrderCategory::Simple, amount, flag);
            let expected = if flag { OrderStatus::Completed } else { OrderStatus::InProgress };
            prop_assert_eq!(SimpleOrderProcessor.process(&mut o), Ok(expected));
        }
    }
}
