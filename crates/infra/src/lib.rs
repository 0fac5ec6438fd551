//! Infrastructure layer: collaborator adapters and configuration loading.

pub mod config;
pub mod csv_export;
pub mod in_memory;
pub mod scripted_api;

#[cfg(test)]
mod test_support;

pub use config::{AppConfig, AppConfigError, ExportConfig, LoggingConfig};
pub use csv_export::CsvFileExporter;
pub use in_memory::InMemoryOrderRepository;
pub use scripted_api::ScriptedApiClient;
