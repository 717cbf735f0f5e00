//! CSV file market data adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with a header row and columns
//! `date,open,high,low,close[,volume]`. The entry price is the last close.

use crate::domain::error::SignalError;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::ports::market_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const SOURCE: &str = "csv prices";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_all(&self, symbol: &str) -> Result<PriceSeries, SignalError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| {
            SignalError::source(SOURCE, format!("failed to read {}: {}", path.display(), e))
        })?;
        parse_bars(&content)
    }
}

pub fn parse_bars(content: &str) -> Result<PriceSeries, SignalError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let mut bars = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record =
            result.map_err(|e| SignalError::source(SOURCE, format!("CSV parse error: {}", e)))?;
        let line = row + 2;

        let date_str = record
            .get(0)
            .ok_or_else(|| SignalError::source(SOURCE, format!("line {line}: missing date")))?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
            SignalError::source(SOURCE, format!("line {line}: invalid date {date_str}: {e}"))
        })?;

        bars.push(OhlcvBar {
            date,
            open: price_field(&record, 1, "open", line)?,
            high: price_field(&record, 2, "high", line)?,
            low: price_field(&record, 3, "low", line)?,
            close: price_field(&record, 4, "close", line)?,
            volume: match record.get(5) {
                Some(v) if !v.is_empty() => price_field(&record, 5, "volume", line)?,
                _ => 0.0,
            },
        });
    }

    Ok(PriceSeries::new(bars))
}

fn price_field(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    line: usize,
) -> Result<f64, SignalError> {
    record
        .get(index)
        .ok_or_else(|| SignalError::source(SOURCE, format!("line {line}: missing {name} column")))?
        .parse()
        .map_err(|e| SignalError::source(SOURCE, format!("line {line}: invalid {name} value: {e}")))
}

impl MarketDataPort for CsvAdapter {
    fn fetch_daily_bars(&self, symbol: &str, limit: usize) -> Result<PriceSeries, SignalError> {
        let series = self.read_all(symbol)?;
        let skip = series.len().saturating_sub(limit);
        Ok(PriceSeries::new(series.bars()[skip..].to_vec()))
    }

    fn last_price(&self, symbol: &str) -> Result<f64, SignalError> {
        self.read_all(symbol)?
            .last()
            .map(|b| b.close)
            .ok_or_else(|| SignalError::source(SOURCE, format!("{symbol} has no rows")))
    }
}
