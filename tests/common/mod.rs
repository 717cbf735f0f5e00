#![allow(dead_code)]

use chrono::NaiveDate;
use daysignal::domain::error::SignalError;
pub use daysignal::domain::ohlcv::{OhlcvBar, PriceSeries};
use daysignal::ports::market_port::MarketDataPort;
use daysignal::ports::notify_port::NotifyPort;
use daysignal::ports::sentiment_port::{SentimentPort, StablecoinLiquidity};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;

pub struct MockMarketPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockMarketPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    fn bars_for(&self, symbol: &str) -> Result<Vec<OhlcvBar>, SignalError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SignalError::Source {
                source_name: "mock market".into(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }
}

impl MarketDataPort for MockMarketPort {
    fn fetch_daily_bars(&self, symbol: &str, limit: usize) -> Result<PriceSeries, SignalError> {
        let bars = self.bars_for(symbol)?;
        let skip = bars.len().saturating_sub(limit);
        Ok(PriceSeries::new(bars[skip..].to_vec()))
    }

    fn last_price(&self, symbol: &str) -> Result<f64, SignalError> {
        self.bars_for(symbol)?
            .last()
            .map(|b| b.close)
            .ok_or_else(|| SignalError::Source {
                source_name: "mock market".into(),
                reason: format!("no price for {symbol}"),
            })
    }
}

/// Each field is either an observation or the reason it is unavailable.
pub struct MockSentimentPort {
    pub etf: Result<f64, String>,
    pub stable: Result<StablecoinLiquidity, String>,
    pub vc: Result<u32, String>,
    pub treasury: Result<i64, String>,
}

impl MockSentimentPort {
    /// Scores 35 + 30 + 15 + 20 = 100.
    pub fn bullish() -> Self {
        Self {
            etf: Ok(1200.0),
            stable: Ok(StablecoinLiquidity {
                total_usd: 160e9,
                change_7d_usd: 2e9,
            }),
            vc: Ok(12),
            treasury: Ok(20),
        }
    }

    /// Scores 0 + 0 + 5 + 0 = 5.
    pub fn bearish() -> Self {
        Self {
            etf: Ok(-1500.0),
            stable: Ok(StablecoinLiquidity {
                total_usd: 150e9,
                change_7d_usd: -1e9,
            }),
            vc: Ok(0),
            treasury: Ok(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            etf: Err("etf down".into()),
            stable: Err("stable down".into()),
            vc: Err("vc down".into()),
            treasury: Err("treasury down".into()),
        }
    }
}

fn observed<T: Clone>(value: &Result<T, String>, name: &str) -> Result<T, SignalError> {
    value.clone().map_err(|reason| SignalError::Source {
        source_name: name.to_string(),
        reason,
    })
}

impl SentimentPort for MockSentimentPort {
    fn etf_net_flow_musd(&self) -> Result<f64, SignalError> {
        observed(&self.etf, "mock etf")
    }

    fn stablecoin_liquidity(&self) -> Result<StablecoinLiquidity, SignalError> {
        observed(&self.stable, "mock stablecoins")
    }

    fn vc_funding_7d_count(&self) -> Result<u32, SignalError> {
        observed(&self.vc, "mock vc")
    }

    fn treasury_conviction_points(&self) -> Result<i64, SignalError> {
        observed(&self.treasury, "mock treasury")
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<String>>,
}

impl NotifyPort for RecordingNotifier {
    fn deliver(&self, text: &str) -> Result<(), SignalError> {
        self.sent.borrow_mut().push(text.to_string());
        Ok(())
    }
}

pub struct FailingNotifier;

impl NotifyPort for FailingNotifier {
    fn deliver(&self, _text: &str) -> Result<(), SignalError> {
        Err(SignalError::Delivery {
            reason: "HTTP 401 Unauthorized".into(),
        })
    }
}

fn bar(day: usize, close: f64) -> OhlcvBar {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    OhlcvBar {
        date: start + chrono::Duration::days(day as i64),
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000.0,
    }
}

/// Closes 100, 101, 102, ... Every true range is 2.
pub fn rising_bars(count: usize) -> Vec<OhlcvBar> {
    (0..count).map(|i| bar(i, 100.0 + i as f64)).collect()
}

/// Closes 500, 499, 498, ... Every true range is 2.
pub fn falling_bars(count: usize) -> Vec<OhlcvBar> {
    (0..count).map(|i| bar(i, 500.0 - i as f64)).collect()
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn bars_to_csv(bars: &[OhlcvBar]) -> String {
    let mut out = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    out
}
