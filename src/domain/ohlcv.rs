//! Daily OHLCV bars and the per-instrument price series.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Chronological daily bars for one instrument, most recent last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    /// Builds a series, ordering the bars by date.
    pub fn new(mut bars: Vec<OhlcvBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self { bars }
    }

    /// Minimum number of bars needed to evaluate both SMA(`sma_period`)
    /// and ATR(`atr_period`).
    pub fn required_len(sma_period: usize, atr_period: usize) -> usize {
        sma_period.max(atr_period) + 1
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&OhlcvBar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }
}
