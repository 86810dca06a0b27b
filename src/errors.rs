use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failure talking to the upstream market-data API. `endpoint` is the short
/// endpoint name (e.g. `instruments-info`) so the message says where it broke.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("network error calling {endpoint}: {source}")]
    Unavailable {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {endpoint}")]
    Http { endpoint: &'static str, status: u16 },

    #[error("failed to decode JSON from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("retCode != 0 from {endpoint}: {code} - {message}")]
    Application {
        endpoint: &'static str,
        code: i64,
        message: String,
    },

    #[error("{endpoint} still returned a cursor after {pages} pages")]
    PageLimit { endpoint: &'static str, pages: usize },
}

impl ExchangeError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "unavailable",
            Self::Http { .. } => "http",
            Self::Decode { .. } => "decode",
            Self::Application { .. } => "application",
            Self::PageLimit { .. } => "page_limit",
        }
    }
}

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Upstream(#[from] ExchangeError),

    #[error("no USDT perpetual contracts found")]
    NoData,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::NoData => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({ "detail": self.to_string() });
        (status, Json(body)).into_response()
    }
}
