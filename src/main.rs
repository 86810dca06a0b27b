mod api;
mod config;
mod errors;
mod exchanges;
mod funding;
mod models;

use api::ApiServer;
use config::{Config, LogFormat};
use exchanges::Exchange;
use exchanges::bybit::Bybit;
use funding::FundingService;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let exchange: Arc<dyn Exchange> = Arc::new(Bybit::new(&config)?);

    tracing::info!(
        "Funding board starting on port {} (upstream: {} at {}, timeout {}s)",
        config.api_port,
        exchange.name(),
        config.bybit_base_url,
        config.upstream_timeout_secs
    );

    let service = FundingService::new(exchange);
    ApiServer::new(service).run(&config).await
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
