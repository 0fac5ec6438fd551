//! Order processing domain module.
//!
//! This crate holds the rule-dispatch engine: every order fetched for a user is
//! routed to an outcome strategy by its category, assigned a priority tier from
//! its amount, and written back through the order store. Collaborators (order
//! source/store, API client, file exporter) are traits in [`ports`]; this crate
//! performs no IO of its own.

pub mod config;
pub mod order;
pub mod ports;
pub mod priority;
pub mod processor;
pub mod selector;
pub mod service;

pub use config::ProcessingConfig;
pub use order::{Order, OrderCategory, OrderError, OrderStatus, Outcome};
pub use ports::{
    ApiCallError, ApiClient, ApiResponse, ExportError, FileExporter, OrderSource, OrderStore,
    SourceError, StoreError,
};
pub use priority::{Priority, PriorityCalculator};
pub use processor::{
    ApiOrderProcessor, ExportOrderProcessor, OrderProcessor, SimpleOrderProcessor,
    UnknownOrderProcessor,
};
pub use selector::ProcessorSelector;
pub use service::{BatchError, BatchReport, OrderProcessingService};
