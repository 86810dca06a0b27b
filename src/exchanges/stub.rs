//! In-memory exchange for handler and service tests.

use super::Exchange;
use crate::errors::ExchangeError;
use crate::models::{Instrument, Ticker};
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Default)]
pub struct StubExchange {
    instruments: Vec<Instrument>,
    tickers: HashMap<String, Ticker>,
    instruments_error: Option<(i64, String)>,
    tickers_error: Option<(i64, String)>,
}

impl StubExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instrument(mut self, symbol: &str) -> Self {
        self.instruments.push(Instrument {
            symbol: symbol.to_string(),
            category: "linear".to_string(),
            quote_currency: "USDT".to_string(),
            contract_type: "LinearPerpetual".to_string(),
        });
        self
    }

    pub fn with_ticker(self, symbol: &str, funding_rate: &str) -> Self {
        self.with_raw_ticker(Ticker {
            symbol: Some(symbol.to_string()),
            last_price: Some("1.0".to_string()),
            index_price: Some("1.0".to_string()),
            mark_price: Some("1.0".to_string()),
            funding_rate: Some(funding_rate.to_string()),
            next_funding_time: Some(String::new()),
            funding_interval_hour: Some("8".to_string()),
        })
    }

    pub fn with_raw_ticker(mut self, ticker: Ticker) -> Self {
        let symbol = ticker.symbol.clone().unwrap_or_default();
        self.tickers.insert(symbol, ticker);
        self
    }

    pub fn failing_instruments(mut self, code: i64, message: &str) -> Self {
        self.instruments_error = Some((code, message.to_string()));
        self
    }

    pub fn failing_tickers(mut self, code: i64, message: &str) -> Self {
        self.tickers_error = Some((code, message.to_string()));
        self
    }
}

fn application_error(endpoint: &'static str, (code, message): &(i64, String)) -> ExchangeError {
    ExchangeError::Application {
        endpoint,
        code: *code,
        message: message.clone(),
    }
}

#[async_trait]
impl Exchange for StubExchange {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn list_perpetual_instruments(&self) -> Result<Vec<Instrument>, ExchangeError> {
        match &self.instruments_error {
            Some(e) => Err(application_error("instruments-info", e)),
            None => Ok(self.instruments.clone()),
        }
    }

    async fn fetch_tickers(&self) -> Result<HashMap<String, Ticker>, ExchangeError> {
        match &self.tickers_error {
            Some(e) => Err(application_error("tickers", e)),
            None => Ok(self.tickers.clone()),
        }
    }
}
