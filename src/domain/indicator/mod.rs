//! Technical indicators and the per-coin indicator snapshot.
//!
//! - `IndicatorType`: indicator identity + period, used in error messages and text output
//! - `Trend`: close-versus-SMA classification
//! - `IndicatorSnapshot`: everything the plan generator needs about one coin

pub mod atr;
pub mod sma;

pub use atr::average_true_range;
pub use sma::simple_moving_average;

use crate::domain::error::SignalError;
use crate::domain::ohlcv::PriceSeries;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Atr(usize),
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "UP"),
            Trend::Down => write!(f, "DOWN"),
        }
    }
}

/// `Up` only when the close is strictly above the SMA; a tie is `Down`.
pub fn classify_trend(last_close: f64, sma_value: f64) -> Trend {
    if last_close > sma_value {
        Trend::Up
    } else {
        Trend::Down
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub symbol: String,
    pub entry_price: f64,
    pub last_close: f64,
    pub sma_value: f64,
    pub atr_value: f64,
    pub trend: Trend,
}

impl IndicatorSnapshot {
    pub fn compute(
        symbol: &str,
        series: &PriceSeries,
        entry_price: f64,
        sma_period: usize,
        atr_period: usize,
    ) -> Result<Self, SignalError> {
        let closes = series.closes();
        let sma_value = simple_moving_average(&closes, sma_period)?;
        let atr_value = average_true_range(&series.highs(), &series.lows(), &closes, atr_period)?;

        // non-empty: the SMA above succeeded with period >= 1
        let last_close = closes[closes.len() - 1];

        Ok(Self {
            symbol: symbol.to_string(),
            entry_price,
            last_close,
            sma_value,
            atr_value,
            trend: classify_trend(last_close, sma_value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::OhlcvBar;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn rising_series(count: usize) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::new(
            (0..count)
                .map(|i| {
                    let close = 100.0 + i as f64;
                    OhlcvBar {
                        date: start + chrono::Duration::days(i as i64),
                        open: close - 0.5,
                        high: close + 1.0,
                        low: close - 1.0,
                        close,
                        volume: 10.0,
                    }
                })
                .collect(),
        )
    }

    #[test]
    fn indicator_type_display() {
        assert_eq!(IndicatorType::Sma(50).to_string(), "SMA(50)");
        assert_eq!(IndicatorType::Atr(14).to_string(), "ATR(14)");
    }

    #[test]
    fn trend_strictly_above_is_up() {
        assert_eq!(classify_trend(101.0, 100.0), Trend::Up);
        assert_eq!(classify_trend(99.0, 100.0), Trend::Down);
    }

    #[test]
    fn trend_tie_resolves_down() {
        assert_eq!(classify_trend(100.0, 100.0), Trend::Down);
    }

    #[test]
    fn snapshot_on_rising_series() {
        let series = rising_series(6);
        let snap = IndicatorSnapshot::compute("BTCUSDT", &series, 106.0, 3, 2).unwrap();

        assert_eq!(snap.symbol, "BTCUSDT");
        assert_relative_eq!(snap.last_close, 105.0);
        // mean(103, 104, 105)
        assert_relative_eq!(snap.sma_value, 104.0);
        // each TR = max(2, |c+1 - (c-1)|, |c-1 - (c-1)|) = 2
        assert_relative_eq!(snap.atr_value, 2.0);
        assert_eq!(snap.trend, Trend::Up);
        assert_relative_eq!(snap.entry_price, 106.0);
    }

    #[test]
    fn snapshot_requires_atr_history() {
        // 3 bars give SMA(3) but only 2 true ranges
        let series = rising_series(3);
        let err = IndicatorSnapshot::compute("ETHUSDT", &series, 100.0, 3, 3).unwrap_err();
        assert!(matches!(
            err,
            SignalError::InsufficientData { ref indicator, have: 2, need: 3 } if indicator == "ATR(3)"
        ));
    }

    #[test]
    fn snapshot_requires_sma_history() {
        let series = rising_series(10);
        let err = IndicatorSnapshot::compute("SOLUSDT", &series, 100.0, 50, 3).unwrap_err();
        assert!(matches!(err, SignalError::InsufficientData { need: 50, .. }));
    }

    #[test]
    fn snapshot_on_empty_series_fails() {
        let err =
            IndicatorSnapshot::compute("BTCUSDT", &PriceSeries::default(), 1.0, 1, 1).unwrap_err();
        assert!(matches!(err, SignalError::InsufficientData { have: 0, .. }));
    }
}
