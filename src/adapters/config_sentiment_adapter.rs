//! Sentiment observations read from the `[sentiment]` config section.
//!
//! Used for offline runs and for the treasury input, which has no automated
//! source. A key that is absent is reported as an unavailable observation.

use crate::domain::error::SignalError;
use crate::ports::config_port::ConfigPort;
use crate::ports::sentiment_port::{SentimentPort, StablecoinLiquidity};

const SECTION: &str = "sentiment";

/// Treasury points when the operator has not entered any: "neutral / no news".
pub const DEFAULT_TREASURY_POINTS: i64 = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSentimentAdapter {
    pub etf_net_flow_musd: Option<f64>,
    pub stablecoin_total_usd: Option<f64>,
    pub stablecoin_7d_change_usd: Option<f64>,
    pub vc_funding_7d_count: Option<u32>,
    pub treasury_points: i64,
}

impl ConfigSentimentAdapter {
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, SignalError> {
        Ok(Self {
            etf_net_flow_musd: optional_double(config, "etf_net_flow_musd")?,
            stablecoin_total_usd: optional_double(config, "stablecoin_total_usd")?,
            stablecoin_7d_change_usd: optional_double(config, "stablecoin_7d_change_usd")?,
            vc_funding_7d_count: optional_double(config, "vc_funding_7d_count")?
                .map(|v| v.max(0.0) as u32),
            treasury_points: treasury_points(config)?,
        })
    }
}

/// The manual treasury input; shared with the HTTP sentiment adapter.
pub fn treasury_points(config: &dyn ConfigPort) -> Result<i64, SignalError> {
    config.get_int(SECTION, "treasury_points", DEFAULT_TREASURY_POINTS)
}

fn optional_double(config: &dyn ConfigPort, key: &str) -> Result<Option<f64>, SignalError> {
    match config.get_string(SECTION, key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| SignalError::invalid(SECTION, key, format!("{raw} is not a number"))),
    }
}

fn required<T: Copy>(value: Option<T>, key: &str) -> Result<T, SignalError> {
    value.ok_or_else(|| {
        SignalError::source(SECTION, format!("{key} not set in [{SECTION}]"))
    })
}

impl SentimentPort for ConfigSentimentAdapter {
    fn etf_net_flow_musd(&self) -> Result<f64, SignalError> {
        required(self.etf_net_flow_musd, "etf_net_flow_musd")
    }

    fn stablecoin_liquidity(&self) -> Result<StablecoinLiquidity, SignalError> {
        Ok(StablecoinLiquidity {
            total_usd: self.stablecoin_total_usd.unwrap_or(0.0),
            change_7d_usd: required(self.stablecoin_7d_change_usd, "stablecoin_7d_change_usd")?,
        })
    }

    fn vc_funding_7d_count(&self) -> Result<u32, SignalError> {
        required(self.vc_funding_7d_count, "vc_funding_7d_count")
    }

    fn treasury_conviction_points(&self) -> Result<i64, SignalError> {
        Ok(self.treasury_points)
    }
}
