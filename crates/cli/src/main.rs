use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use orderflow_core::UserId;
use orderflow_infra::{AppConfig, CsvFileExporter, InMemoryOrderRepository};
use orderflow_observability::LogFormat;
use orderflow_orders::{Order, OrderProcessingService, OrderSource, ProcessingConfig};

mod demo;

/// Run the order processing demo batch for one user.
#[derive(Debug, Parser)]
#[command(name = "orderflow", version)]
struct Cli {
    /// User whose orders are processed (the demo data belongs to user 1).
    #[arg(long, default_value_t = 1)]
    user_id: u64,

    /// Directory holding `default.toml` and per-environment overrides.
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// Where CSV exports are written (overrides `export.output_dir`).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the batch report as JSON instead of the text summary.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config_dir = cli.config_dir.display();
    let config = AppConfig::load_from(&cli.config_dir)
        .with_context(|| format!("loading configuration from {config_dir}"))?;
    orderflow_observability::tracing::init(
        LogFormat::from_json_flag(config.logging.json),
        &config.logging.level,
    );

    let user_id = UserId::new(cli.user_id);
    let repo = Arc::new(demo::repository().context("building demo orders")?);
    let output_dir = cli.output_dir.unwrap_or(config.export.output_dir);
    let service = build_service(repo.clone(), &output_dir, config.processing);

    tracing::info!(%user_id, "running demo batch");
    let success = if cli.json {
        let report = service.process_batch(user_id);
        match &report {
            Ok(report) => println!("{}", serde_json::to_string_pretty(report)?),
            Err(err) => println!(
                "{}",
                serde_json::json!({ "user_id": user_id, "error": err.to_string() })
            ),
        }
        report.is_ok_and(|r| r.is_success())
    } else {
        let (success, orders) = run_batch(&service, &repo, user_id)?;
        for line in summary_lines(success, &orders) {
            println!("{line}");
        }
        success
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn build_service(
    repo: Arc<InMemoryOrderRepository>,
    output_dir: &Path,
    config: ProcessingConfig,
) -> OrderProcessingService {
    let exporter = CsvFileExporter::new(output_dir)
        .with_high_value_threshold(config.high_value_order_threshold);

    OrderProcessingService::new(
        repo.clone(),
        repo,
        Arc::new(demo::api_client()),
        Arc::new(exporter),
    )
    .with_config(config)
}

/// Process the batch and return the orders as the orchestrator left them.
///
/// Orders whose write was refused are only `db_error` in the batch report, so
/// the stored copies are read back only when the batch never ran.
fn run_batch(
    service: &OrderProcessingService,
    repo: &InMemoryOrderRepository,
    user_id: UserId,
) -> anyhow::Result<(bool, Vec<Order>)> {
    match service.process_batch(user_id) {
        Ok(report) => Ok((report.is_success(), report.orders)),
        Err(err) => {
            tracing::warn!(%user_id, error = %err, "order batch not processed");
            let stored = repo
                .get_orders(user_id)
                .context("reading back stored orders")?;
            Ok((false, stored))
        }
    }
}

fn summary_lines(success: bool, orders: &[Order]) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Processing result: {}\n",
            if success { "Success" } else { "Failed" }
        ),
        "Final Order Statuses:".to_string(),
    ];
    lines.extend(orders.iter().map(|order| {
        format!(
            "Order ID: {}, Type: {}, Status: {}, Priority: {}",
            order.id(),
            order.category(),
            order.outcome(),
            order.priority()
        )
    }));
    lines
}
