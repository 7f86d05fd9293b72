//! Sheet VCF Bot - Main entry point
//!
//! Long-polls the Bale bot API and answers spreadsheet uploads with a zip of
//! per-category vCard files.

use anyhow::Result;
use sheet_vcf_bot::bot::{run_bot, UpdateHandler};
use sheet_vcf_bot::client::{AsyncBaleClient, BaleClient, BotApi};
use sheet_vcf_bot::{Config, Metrics};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up .env before building the filter so LOG_LEVEL can come from it
    let _ = dotenvy::dotenv();
    let default_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    // Initialize logging (stderr only) before anything can warn
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        api_url = %config.api_url,
        admin_alerts = config.admin_chat_id.is_some(),
        max_upload_bytes = config.max_upload_bytes,
        "Starting Sheet VCF Bot"
    );

    let metrics = Metrics::new();
    let sync_client = BaleClient::new(&config, metrics.clone());
    let api = Arc::new(AsyncBaleClient::new(sync_client)) as Arc<dyn BotApi>;
    let handler = Arc::new(UpdateHandler::new(api.clone(), &config, metrics.clone()));

    run_bot(api, handler, config.poll_timeout).await?;

    let summary = metrics.summary();
    info!(
        conversions = summary.conversions_succeeded_total,
        failures = summary.conversions_failed_total,
        contacts = summary.contacts_converted_total,
        rows_rejected = summary.rows_rejected_total,
        http_requests = summary.http_requests_total,
        "Sheet VCF Bot shutdown complete"
    );
    Ok(())
}
