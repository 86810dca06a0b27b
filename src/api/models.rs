use crate::models::FundingRow;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NOTIONAL: f64 = 1000.0;

/// Query string for GET /funding
#[derive(Debug, Deserialize)]
pub struct FundingQuery {
    pub notional: Option<f64>,
}

/// Response for GET /funding
#[derive(Debug, Serialize)]
pub struct FundingResponse {
    pub notional: f64,
    pub count: usize,
    pub elapsed_seconds: f64,
    pub generated_at: String,
    pub data: Vec<FundingRow>,
}
