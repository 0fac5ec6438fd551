//! Category → strategy routing.

use orderflow_core::UserId;

use crate::config::ProcessingConfig;
use crate::order::{Order, OrderCategory};
use crate::ports::{ApiClient, FileExporter};
use crate::processor::{
    ApiOrderProcessor, ExportOrderProcessor, OrderProcessor, SimpleOrderProcessor,
    UnknownOrderProcessor,
};

/// Picks the strategy for an order and binds it to the collaborators it needs.
///
/// New categories only need a new arm here; the orchestrator is unaffected.
pub struct ProcessorSelector<'a> {
    exporter: &'a dyn FileExporter,
    api_client: &'a dyn ApiClient,
    config: ProcessingConfig,
}

impl<'a> ProcessorSelector<'a> {
    pub fn new(
        exporter: &'a dyn FileExporter,
        api_client: &'a dyn ApiClient,
        config: ProcessingConfig,
    ) -> Self {
        Self {
            exporter,
            api_client,
            config,
        }
    }

    pub fn select(&self, order: &Order, user_id: UserId) -> Box<dyn OrderProcessor + 'a> {
        match order.category() {
            OrderCategory::Export => Box::new(ExportOrderProcessor::new(self.exporter, user_id)),
            OrderCategory::Api => Box::new(
                ApiOrderProcessor::new(self.api_client).with_thresholds(
                    self.config.api_data_threshold,
                    self.config.api_amount_threshold,
                ),
            ),
            OrderCategory::Simple => Box::new(SimpleOrderProcessor),
            OrderCategory::Unknown => Box::new(UnknownOrderProcessor),
        }
    }
}
