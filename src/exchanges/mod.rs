use crate::errors::ExchangeError;
use crate::models::{Instrument, Ticker};
use async_trait::async_trait;
use std::collections::HashMap;

pub mod bybit;

#[cfg(test)]
pub mod stub;

#[async_trait]
pub trait Exchange: Send + Sync {
    fn name(&self) -> &'static str;

    /// Every actively trading USDT linear perpetual, across all catalog pages.
    async fn list_perpetual_instruments(&self) -> Result<Vec<Instrument>, ExchangeError>;

    /// Current ticker snapshot for the linear category, keyed by symbol.
    async fn fetch_tickers(&self) -> Result<HashMap<String, Ticker>, ExchangeError>;
}
