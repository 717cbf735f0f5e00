//! Market data port trait.

use crate::domain::error::SignalError;
use crate::domain::ohlcv::PriceSeries;

pub trait MarketDataPort {
    /// Up to `limit` most recent daily bars for `symbol`, chronological.
    fn fetch_daily_bars(&self, symbol: &str, limit: usize) -> Result<PriceSeries, SignalError>;

    /// Current price used as the plan's entry reference.
    fn last_price(&self, symbol: &str) -> Result<f64, SignalError>;
}
