use crate::models::{Direction, FundingRow, Instrument, Ticker};
use chrono::{DateTime, TimeDelta, Utc};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Bybit's standard funding cycle, used when the ticker doesn't say otherwise.
pub const DEFAULT_FUNDING_INTERVAL_HOURS: f64 = 8.0;

/// Parses an upstream numeric string. Anything unparsable is `None`, never an error.
pub fn parse_or_absent(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok()
}

/// Funding interval in hours; missing, garbage or non-positive values fall back to 8h.
pub fn funding_interval_hours(raw: Option<&str>) -> f64 {
    parse_or_absent(raw)
        .filter(|hours| *hours > 0.0)
        .unwrap_or(DEFAULT_FUNDING_INTERVAL_HOURS)
}

/// Renders the time left until `next_funding_ms` as `HH:MM:SS`.
///
/// Returns `"-"` when the timestamp is missing or unparsable and `"00:00:00"`
/// once it is in the past. Hours are not capped at 99.
pub fn format_time_remaining(next_funding_ms: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(next) = next_funding_ms
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(DateTime::<Utc>::from_timestamp_millis)
    else {
        return "-".to_string();
    };

    let remaining = next - now;
    if remaining <= TimeDelta::zero() {
        return "00:00:00".to_string();
    }

    let secs = remaining.num_seconds();
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

/// Builds the board row for one instrument/ticker pair.
pub fn build_row(
    instrument: &Instrument,
    ticker: &Ticker,
    notional: f64,
    now: DateTime<Utc>,
) -> FundingRow {
    let funding_rate = parse_or_absent(ticker.funding_rate.as_deref()).unwrap_or(0.0);
    let interval = funding_interval_hours(ticker.funding_interval_hour.as_deref());

    let cycle_cost = notional * funding_rate;

    FundingRow {
        symbol: instrument.symbol.clone(),
        category: instrument.category.clone(),
        notional,
        funding_rate_percent: funding_rate * 100.0,
        direction: Direction::from_rate(funding_rate),
        cycle_cost,
        hourly_cost: cycle_cost / interval,
        last_price: parse_or_absent(ticker.last_price.as_deref()),
        index_price: parse_or_absent(ticker.index_price.as_deref()),
        mark_price: parse_or_absent(ticker.mark_price.as_deref()),
        funding_interval_hours: interval,
        time_remaining: format_time_remaining(ticker.next_funding_time.as_deref(), now),
    }
}

/// Inner-joins instruments with tickers and sorts by funding rate, highest first.
/// Instruments without a ticker are dropped.
pub fn compute_rows(
    instruments: &[Instrument],
    tickers: &HashMap<String, Ticker>,
    notional: f64,
    now: DateTime<Utc>,
) -> Vec<FundingRow> {
    let mut rows: Vec<FundingRow> = instruments
        .iter()
        .filter_map(|instrument| {
            let ticker = tickers.get(&instrument.symbol)?;
            Some(build_row(instrument, ticker, notional, now))
        })
        .collect();

    // stable, so equal rates keep catalog order
    rows.sort_by_key(|row| Reverse(OrderedFloat(row.funding_rate_percent)));
    rows
}
