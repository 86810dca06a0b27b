use super::handlers;
use crate::funding::FundingService;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the Axum router with all routes and shared state.
/// CORS is open so the static dashboard can call us from any origin.
pub fn build(service: Arc<FundingService>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/funding", get(handlers::get_funding))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(service)
}
