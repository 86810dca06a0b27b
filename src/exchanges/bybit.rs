use super::Exchange;
use crate::config::Config;
use crate::errors::ExchangeError;
use crate::models::{Instrument, Ticker, lenient_string};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

const CATEGORY: &str = "linear";
const CATALOG_PAGE_SIZE: &str = "1000";
const PERPETUAL: &str = "LinearPerpetual";
const QUOTE_COIN: &str = "USDT";

const INSTRUMENTS: &str = "instruments-info";
const TICKERS: &str = "tickers";

/// Bybit V5 envelope. `result` stays raw until `retCode` has been checked,
/// since error responses often carry an empty or differently shaped result.
#[derive(Debug, Deserialize)]
struct BybitResponse {
    #[serde(rename = "retCode")]
    ret_code: i64,

    #[serde(rename = "retMsg", default)]
    ret_msg: Option<String>,

    #[serde(default)]
    result: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InstrumentsPage {
    list: Vec<RawInstrument>,
    #[serde(deserialize_with = "lenient_string")]
    next_page_cursor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawInstrument {
    #[serde(deserialize_with = "lenient_string")]
    symbol: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    contract_type: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    quote_coin: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TickersPage {
    list: Vec<Ticker>,
}

pub struct Bybit {
    client: reqwest::Client,
    instruments_url: Url,
    tickers_url: Url,
    max_pages: usize,
}

impl Bybit {
    /// Builds the shared HTTP client. One instance lives for the whole process.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // trailing slash so relative joins keep any path prefix (e.g. behind a proxy)
        let base = Url::parse(&format!("{}/", config.bybit_base_url.trim_end_matches('/')))
            .with_context(|| format!("invalid Bybit URL `{}`", config.bybit_base_url))?;

        if config.accept_invalid_certs {
            tracing::warn!("[bybit] TLS certificate validation is DISABLED for {base}");
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            instruments_url: base.join("v5/market/instruments-info")?,
            tickers_url: base.join("v5/market/tickers")?,
            max_pages: config.max_catalog_pages.max(1),
        })
    }

    /// GETs `url` with `params`, checks HTTP status and `retCode`, and decodes
    /// `result` into `T`. A missing or null `result` decodes as `T::default()`.
    async fn get_result<T>(
        &self,
        endpoint: &'static str,
        url: &Url,
        params: &[(&str, &str)],
    ) -> Result<T, ExchangeError>
    where
        T: DeserializeOwned + Default,
    {
        let result = self.call(endpoint, url, params).await;

        if let Err(e) = &result {
            metrics::counter!(
                "funding_board_upstream_errors_total",
                "endpoint" => endpoint,
                "kind" => e.kind()
            )
            .increment(1);
            tracing::warn!("[bybit] {e}");
        }

        result
    }

    async fn call<T>(
        &self,
        endpoint: &'static str,
        url: &Url,
        params: &[(&str, &str)],
    ) -> Result<T, ExchangeError>
    where
        T: DeserializeOwned + Default,
    {
        let mut url = url.clone();
        url.query_pairs_mut().extend_pairs(params);

        metrics::counter!("funding_board_upstream_requests_total", "endpoint" => endpoint)
            .increment(1);
        tracing::debug!("[bybit] GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ExchangeError::Unavailable { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExchangeError::Http {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ExchangeError::Unavailable { endpoint, source })?;

        let envelope: BybitResponse = serde_json::from_slice(&body)
            .map_err(|source| ExchangeError::Decode { endpoint, source })?;

        // Bybit signals errors via retCode, not just HTTP status
        if envelope.ret_code != 0 {
            return Err(ExchangeError::Application {
                endpoint,
                code: envelope.ret_code,
                message: envelope.ret_msg.unwrap_or_default(),
            });
        }

        match envelope.result {
            Some(value) if !value.is_null() => serde_json::from_value(value)
                .map_err(|source| ExchangeError::Decode { endpoint, source }),
            _ => Ok(T::default()),
        }
    }
}

/// Keeps only USDT-quoted linear perpetuals with a symbol.
fn usdt_perpetual(raw: RawInstrument) -> Option<Instrument> {
    let symbol = raw.symbol.filter(|s| !s.is_empty())?;

    if raw.contract_type.as_deref() != Some(PERPETUAL) {
        return None;
    }
    if raw.quote_coin.as_deref() != Some(QUOTE_COIN) {
        return None;
    }

    Some(Instrument {
        symbol,
        category: CATEGORY.to_string(),
        quote_currency: QUOTE_COIN.to_string(),
        contract_type: PERPETUAL.to_string(),
    })
}

#[async_trait]
impl Exchange for Bybit {
    fn name(&self) -> &'static str {
        "bybit"
    }

    /// Walks the catalog with `nextPageCursor` until it comes back empty.
    /// `status=Trading` makes Bybit drop delisted and pre-launch pairs for us.
    async fn list_perpetual_instruments(&self) -> Result<Vec<Instrument>, ExchangeError> {
        let mut instruments = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page: InstrumentsPage = {
                let mut params = vec![
                    ("category", CATEGORY),
                    ("status", "Trading"),
                    ("limit", CATALOG_PAGE_SIZE),
                ];
                if let Some(c) = cursor.as_deref() {
                    params.push(("cursor", c));
                }

                self.get_result(INSTRUMENTS, &self.instruments_url, &params)
                    .await?
            };
            pages += 1;

            let fetched = page.list.len();
            instruments.extend(page.list.into_iter().filter_map(usdt_perpetual));
            tracing::debug!(
                "[bybit] catalog page {pages}: {fetched} instruments, {} kept so far",
                instruments.len()
            );

            cursor = page.next_page_cursor.filter(|c| !c.is_empty());
            if cursor.is_none() {
                break;
            }

            if pages >= self.max_pages {
                return Err(ExchangeError::PageLimit {
                    endpoint: INSTRUMENTS,
                    pages,
                });
            }
        }

        Ok(instruments)
    }

    /// The tickers endpoint returns the whole category in a single page.
    async fn fetch_tickers(&self) -> Result<HashMap<String, Ticker>, ExchangeError> {
        let page: TickersPage = self
            .get_result(TICKERS, &self.tickers_url, &[("category", CATEGORY)])
            .await?;

        let tickers = page
            .list
            .into_iter()
            .filter_map(|ticker| {
                let symbol = ticker.symbol.clone().filter(|s| !s.is_empty())?;
                Some((symbol, ticker))
            })
            .collect::<HashMap<_, _>>();

        tracing::debug!("[bybit] {} linear tickers", tickers.len());
        Ok(tickers)
    }
}
