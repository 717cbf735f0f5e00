//! Binance public REST market data adapter.
//!
//! - `GET /api/v3/klines?symbol=..&interval=1d&limit=..` for daily candles
//! - `GET /api/v3/ticker/price?symbol=..` for the current price
//!
//! Kline rows are JSON arrays whose price fields are decimal strings:
//! `[open_time_ms, open, high, low, close, volume, close_time_ms, ...]`.

use crate::adapters::http;
use crate::domain::error::SignalError;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::ports::market_port::MarketDataPort;
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

const SOURCE: &str = "binance";

#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

pub struct BinanceAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl BinanceAdapter {
    pub fn new(base_url: &str) -> Result<Self, SignalError> {
        Ok(Self {
            client: http::build_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn klines_url(&self, symbol: &str, limit: usize) -> String {
        format!(
            "{}/api/v3/klines?symbol={}&interval=1d&limit={}",
            self.base_url, symbol, limit
        )
    }

    fn ticker_url(&self, symbol: &str) -> String {
        format!("{}/api/v3/ticker/price?symbol={}", self.base_url, symbol)
    }
}

impl MarketDataPort for BinanceAdapter {
    fn fetch_daily_bars(&self, symbol: &str, limit: usize) -> Result<PriceSeries, SignalError> {
        let rows: Vec<Vec<Value>> = http::get_json(&self.client, SOURCE, &self.klines_url(symbol, limit))?;
        parse_klines(&rows)
    }

    fn last_price(&self, symbol: &str) -> Result<f64, SignalError> {
        let ticker: TickerPrice = http::get_json(&self.client, SOURCE, &self.ticker_url(symbol))?;
        parse_price(&ticker.price)
    }
}

pub fn parse_klines(rows: &[Vec<Value>]) -> Result<PriceSeries, SignalError> {
    let bars = rows
        .iter()
        .enumerate()
        .map(|(i, row)| parse_kline(i, row))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PriceSeries::new(bars))
}

fn parse_kline(index: usize, row: &[Value]) -> Result<OhlcvBar, SignalError> {
    let open_time_ms = row
        .first()
        .and_then(Value::as_i64)
        .ok_or_else(|| SignalError::source(SOURCE, format!("kline {index}: missing open time")))?;
    let date = chrono::DateTime::from_timestamp_millis(open_time_ms)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| {
            SignalError::source(SOURCE, format!("kline {index}: invalid open time {open_time_ms}"))
        })?;

    let field = |pos: usize, name: &str| -> Result<f64, SignalError> {
        match row.get(pos) {
            Some(Value::String(s)) => parse_price(s),
            Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
                SignalError::source(SOURCE, format!("kline {index}: {name} out of range"))
            }),
            _ => Err(SignalError::source(
                SOURCE,
                format!("kline {index}: missing {name}"),
            )),
        }
    };

    Ok(OhlcvBar {
        date,
        open: field(1, "open")?,
        high: field(2, "high")?,
        low: field(3, "low")?,
        close: field(4, "close")?,
        volume: field(5, "volume")?,
    })
}

fn parse_price(raw: &str) -> Result<f64, SignalError> {
    raw.parse()
        .map_err(|_| SignalError::source(SOURCE, format!("invalid price {raw}")))
}
