//! Layered application configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. `<dir>/default.toml` (optional)
//! 3. `<dir>/<ORDERFLOW_ENV>` (optional, any supported format; defaults to `development`)
//! 4. `ORDERFLOW_*` environment variables, `__` between nested keys
//!    (e.g. `ORDERFLOW_PROCESSING__API_DATA_THRESHOLD=60`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;

use orderflow_core::DomainError;
use orderflow_orders::ProcessingConfig;

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] DomainError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub processing: ProcessingConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory CSV exports are written into.
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppConfigError> {
        Self::load_from("config")
    }

    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, AppConfigError> {
        let config_dir = config_dir.as_ref();
        let run_env = std::env::var("ORDERFLOW_ENV")
            .unwrap_or_else(|_| "development".to_string());
        let processing = ProcessingConfig::default();

        let builder = Config::builder()
            .set_default(
                "processing.high_priority_threshold",
                processing.high_priority_threshold,
            )?
            .set_default(
                "processing.high_value_order_threshold",
                processing.high_value_order_threshold,
            )?
            .set_default(
                "processing.api_data_threshold",
                processing.api_data_threshold,
            )?
            .set_default(
                "processing.api_amount_threshold",
                processing.api_amount_threshold,
            )?
            .set_default("export.output_dir", ".")?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(run_env)).required(false))
            .add_source(
                Environment::with_prefix("ORDERFLOW")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.processing.validate()?;

        tracing::debug!(config_dir = %config_dir.display(), "configuration loaded");
        Ok(config)
    }
}
