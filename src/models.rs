use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A tradable contract from the instrument catalog, already filtered to
/// USDT linear perpetuals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    pub symbol: String,
    pub category: String,
    pub quote_currency: String,
    pub contract_type: String,
}

/// Raw ticker fields as Bybit sends them. Everything is an optional string;
/// parsing happens when rows are computed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ticker {
    #[serde(deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub last_price: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub index_price: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub mark_price: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub funding_rate: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub next_funding_time: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub funding_interval_hour: Option<String>,
}

/// Reads a field Bybit normally sends as a string. Numbers are kept as their
/// decimal text; any other JSON type (bool, array, object, null) becomes `None`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Which side of the perpetual pays funding to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    #[serde(rename = "Long paga Short")]
    LongPaysShort,
    #[serde(rename = "Short paga Long")]
    ShortPaysLong,
    #[serde(rename = "Neutro")]
    Neutral,
}

impl Direction {
    pub fn from_rate(rate: f64) -> Self {
        if rate > 0.0 {
            Self::LongPaysShort
        } else if rate < 0.0 {
            Self::ShortPaysLong
        } else {
            Self::Neutral
        }
    }
}

/// One row of the funding board. Field names on the wire match the
/// dashboard client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingRow {
    pub symbol: String,
    pub category: String,
    pub notional: f64,
    #[serde(rename = "funding_rate_pct")]
    pub funding_rate_percent: f64,
    #[serde(rename = "direcao")]
    pub direction: Direction,
    #[serde(rename = "taxa_ciclo")]
    pub cycle_cost: f64,
    #[serde(rename = "taxa_hora")]
    pub hourly_cost: f64,
    pub last_price: Option<f64>,
    pub index_price: Option<f64>,
    pub mark_price: Option<f64>,
    #[serde(rename = "funding_interval_hour")]
    pub funding_interval_hours: f64,
    #[serde(rename = "tempo_restante")]
    pub time_remaining: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ticker_accepts_numbers_and_ignores_other_types() {
        let ticker: Ticker = serde_json::from_value(json!({
            "symbol": "ETHUSDT",
            "lastPrice": 2500.5,
            "fundingRate": "-0.0002",
            "nextFundingTime": 1760630400000u64,
            "fundingIntervalHour": 8,
            "markPrice": true,
            "indexPrice": null
        }))
        .unwrap();

        assert_eq!(ticker.symbol.as_deref(), Some("ETHUSDT"));
        assert_eq!(ticker.last_price.as_deref(), Some("2500.5"));
        assert_eq!(ticker.funding_rate.as_deref(), Some("-0.0002"));
        assert_eq!(ticker.next_funding_time.as_deref(), Some("1760630400000"));
        assert_eq!(ticker.funding_interval_hour.as_deref(), Some("8"));
        assert_eq!(ticker.mark_price, None);
        assert_eq!(ticker.index_price, None);
    }

    #[test]
    fn ticker_fields_default_when_missing() {
        let ticker: Ticker = serde_json::from_value(json!({"symbol": "BTCUSDT"})).unwrap();
        assert_eq!(ticker.funding_rate, None);
        assert_eq!(ticker.funding_interval_hour, None);
    }
}
