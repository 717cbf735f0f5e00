//! Sentiment observation port trait.
//!
//! Each observation is fetched independently so that one failing provider
//! only degrades its own sub-score.

use crate::domain::error::SignalError;

/// Total stablecoin market cap and its change over the last 7 days, both in US$.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StablecoinLiquidity {
    pub total_usd: f64,
    pub change_7d_usd: f64,
}

pub trait SentimentPort {
    /// Spot ETF net flow over 7 days, in US$ millions.
    fn etf_net_flow_musd(&self) -> Result<f64, SignalError>;

    fn stablecoin_liquidity(&self) -> Result<StablecoinLiquidity, SignalError>;

    /// Number of distinct funding-round dates seen in the last 7 days.
    fn vc_funding_7d_count(&self) -> Result<u32, SignalError>;

    /// 20 = new treasury buy announced, 10 = no news, 0 = selling.
    fn treasury_conviction_points(&self) -> Result<i64, SignalError>;
}
