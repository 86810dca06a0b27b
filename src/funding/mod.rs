pub mod rows;

use crate::errors::ApiError;
use crate::exchanges::Exchange;
use crate::models::FundingRow;
use chrono::Utc;
use futures_util::future::try_join;
use std::sync::Arc;

pub use rows::compute_rows;

/// Builds the funding board from a live exchange on every call. Nothing is cached.
pub struct FundingService {
    exchange: Arc<dyn Exchange>,
}

impl FundingService {
    pub fn new(exchange: Arc<dyn Exchange>) -> Self {
        Self { exchange }
    }

    /// Fetches catalog and tickers concurrently, then joins and sorts them.
    /// Fails with `NoData` when the catalog has no USDT perpetuals at all.
    pub async fn board(&self, notional: f64) -> Result<Vec<FundingRow>, ApiError> {
        let (instruments, tickers) = try_join(
            self.exchange.list_perpetual_instruments(),
            self.exchange.fetch_tickers(),
        )
        .await?;

        if instruments.is_empty() {
            tracing::warn!("[{}] catalog returned no USDT perpetuals", self.exchange.name());
            return Err(ApiError::NoData);
        }

        let rows = compute_rows(&instruments, &tickers, notional, Utc::now());

        let kind = &instruments[0];
        tracing::debug!(
            "[{}] {} instruments ({} {}), {} tickers, {} rows",
            self.exchange.name(),
            instruments.len(),
            kind.quote_currency,
            kind.contract_type,
            tickers.len(),
            rows.len()
        );

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExchangeError;
    use crate::exchanges::stub::StubExchange;

    #[tokio::test]
    async fn board_joins_and_sorts() {
        let exchange = StubExchange::new()
            .with_instrument("BTCUSDT")
            .with_instrument("ETHUSDT")
            .with_instrument("DOGEUSDT")
            .with_ticker("BTCUSDT", "0.0001")
            .with_ticker("ETHUSDT", "0.0004");

        let rows = FundingService::new(Arc::new(exchange))
            .board(1000.0)
            .await
            .unwrap();

        let symbols: Vec<_> = rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ETHUSDT", "BTCUSDT"]);
    }

    #[tokio::test]
    async fn empty_catalog_is_no_data() {
        let exchange = StubExchange::new().with_ticker("BTCUSDT", "0.0001");

        let err = FundingService::new(Arc::new(exchange))
            .board(1000.0)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NoData));
    }

    #[tokio::test]
    async fn unmatched_catalog_is_an_empty_board() {
        let exchange = StubExchange::new().with_instrument("BTCUSDT");

        let rows = FundingService::new(Arc::new(exchange))
            .board(1000.0)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn ticker_failure_fails_the_board() {
        let exchange = StubExchange::new()
            .with_instrument("BTCUSDT")
            .failing_tickers(10006, "Too many visits");

        let err = FundingService::new(Arc::new(exchange))
            .board(1000.0)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Upstream(ExchangeError::Application { code: 10006, .. })
        ));
    }
}
