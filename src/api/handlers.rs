use super::models::{DEFAULT_NOTIONAL, FundingQuery, FundingResponse};
use crate::errors::ApiError;
use crate::funding::FundingService;
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::Json,
};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use std::time::Instant;

/// GET /health — simple liveness check
pub async fn health() -> &'static str {
    "OK"
}

/// GET /funding — funding board for every USDT perpetual, priced for `notional`
pub async fn get_funding(
    State(service): State<Arc<FundingService>>,
    query: Result<Query<FundingQuery>, QueryRejection>,
) -> Result<Json<FundingResponse>, ApiError> {
    let started = Instant::now();

    let Query(query) = query.map_err(|e| ApiError::Validation(e.body_text()))?;
    let notional = validate_notional(query.notional)?;

    let data = service.board(notional).await?;

    let response = FundingResponse {
        notional,
        count: data.len(),
        elapsed_seconds: started.elapsed().as_secs_f64(),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
        data,
    };

    tracing::info!(
        "funding board: notional={} rows={} in {:.3}s",
        response.notional,
        response.count,
        response.elapsed_seconds
    );

    Ok(Json(response))
}

fn validate_notional(notional: Option<f64>) -> Result<f64, ApiError> {
    let notional = notional.unwrap_or(DEFAULT_NOTIONAL);
    if notional.is_finite() && notional > 0.0 {
        Ok(notional)
    } else {
        Err(ApiError::Validation(format!(
            "notional must be a number greater than 0, got {notional}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notional_defaults_to_one_thousand() {
        assert_eq!(validate_notional(None).unwrap(), 1000.0);
        assert_eq!(validate_notional(Some(0.5)).unwrap(), 0.5);
    }

    #[test]
    fn notional_must_be_positive_and_finite() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                validate_notional(Some(bad)),
                Err(ApiError::Validation(_))
            ));
        }
    }
}
