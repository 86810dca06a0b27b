pub mod handlers;
pub mod models;
pub mod router;

use crate::config::Config;
use crate::funding::FundingService;
use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use std::net::SocketAddr;
use std::sync::Arc;

pub struct ApiServer {
    service: Arc<FundingService>,
}

impl ApiServer {
    /// Wraps the funding service in an Arc for shared handler access.
    pub fn new(service: FundingService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Binds the server to the configured port and serves until Ctrl+C.
    /// Prometheus metrics are exposed on /metrics.
    pub async fn run(self, config: &Config) -> anyhow::Result<()> {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

        let app = router::build(Arc::clone(&self.service))
            .route("/metrics", get(move || async move { metric_handle.render() }))
            .layer(prometheus_layer);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));

        tracing::info!("API server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl+C: {e}");
    }
    tracing::info!("Shutting down...");
}
