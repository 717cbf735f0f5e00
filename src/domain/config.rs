//! Run configuration, validated once at startup.
//!
//! All keys live in the `[signal]` section of the INI file. Missing keys
//! fall back to defaults; present-but-invalid keys are rejected.

use crate::domain::error::SignalError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::plan::RiskConfig;
use crate::ports::config_port::ConfigPort;

const SECTION: &str = "signal";

pub const DEFAULT_COINS: &str = "BTCUSDT,ETHUSDT,SOLUSDT";
pub const DEFAULT_SMA_PERIOD: i64 = 50;
pub const DEFAULT_ATR_PERIOD: i64 = 14;
pub const DEFAULT_ATR_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_REWARD_MULTIPLIER: f64 = 3.0;
pub const DEFAULT_DCA_LEVELS_PCT: &str = "0,-1.5,-3";
pub const DEFAULT_BUY_DAY_SCORE: i64 = 70;
pub const DEFAULT_SELL_DAY_SCORE: i64 = 30;

/// Floor for the number of daily candles requested per coin.
const MIN_KLINE_LIMIT: usize = 220;

#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    pub coins: Vec<String>,
    pub sma_period: usize,
    pub atr_period: usize,
    pub risk: RiskConfig,
    pub buy_day_score: u32,
    pub sell_day_score: u32,
    pub kline_limit: usize,
}

impl SignalConfig {
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, SignalError> {
        let coins = parse_coins(config)?;
        let sma_period = positive_int(config, "sma_period", DEFAULT_SMA_PERIOD)?;
        let atr_period = positive_int(config, "atr_period", DEFAULT_ATR_PERIOD)?;
        let atr_multiplier = positive_double(config, "atr_multiplier", DEFAULT_ATR_MULTIPLIER)?;
        let reward_multiplier =
            positive_double(config, "reward_multiplier", DEFAULT_REWARD_MULTIPLIER)?;
        let dca_levels_pct = parse_dca_levels(config)?;
        let (buy_day_score, sell_day_score) = parse_day_scores(config)?;
        let kline_limit = parse_kline_limit(config, sma_period, atr_period)?;

        Ok(Self {
            coins,
            sma_period,
            atr_period,
            risk: RiskConfig {
                atr_multiplier,
                reward_multiplier,
                dca_levels_pct,
            },
            buy_day_score,
            sell_day_score,
            kline_limit,
        })
    }

    /// Bars needed per coin for both indicators.
    pub fn required_bars(&self) -> usize {
        PriceSeries::required_len(self.sma_period, self.atr_period)
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        let sma_period = DEFAULT_SMA_PERIOD as usize;
        let atr_period = DEFAULT_ATR_PERIOD as usize;
        Self {
            coins: split_list(DEFAULT_COINS)
                .map(str::to_string)
                .collect(),
            sma_period,
            atr_period,
            risk: RiskConfig {
                atr_multiplier: DEFAULT_ATR_MULTIPLIER,
                reward_multiplier: DEFAULT_REWARD_MULTIPLIER,
                dca_levels_pct: vec![0.0, -1.5, -3.0],
            },
            buy_day_score: DEFAULT_BUY_DAY_SCORE as u32,
            sell_day_score: DEFAULT_SELL_DAY_SCORE as u32,
            kline_limit: default_kline_limit(sma_period, atr_period),
        }
    }
}

fn default_kline_limit(sma_period: usize, atr_period: usize) -> usize {
    (sma_period + atr_period + 5).max(MIN_KLINE_LIMIT)
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_coins(config: &dyn ConfigPort) -> Result<Vec<String>, SignalError> {
    let raw = config
        .get_string(SECTION, "coins")
        .unwrap_or_else(|| DEFAULT_COINS.to_string());
    let coins: Vec<String> = split_list(&raw).map(|s| s.to_uppercase()).collect();
    if coins.is_empty() {
        return Err(SignalError::invalid(
            SECTION,
            "coins",
            "at least one coin symbol is required",
        ));
    }
    Ok(coins)
}

fn positive_int(config: &dyn ConfigPort, key: &str, default: i64) -> Result<usize, SignalError> {
    let value = config.get_int(SECTION, key, default)?;
    if value < 1 {
        return Err(SignalError::invalid(
            SECTION,
            key,
            format!("{key} must be at least 1"),
        ));
    }
    Ok(value as usize)
}

fn positive_double(config: &dyn ConfigPort, key: &str, default: f64) -> Result<f64, SignalError> {
    let value = config.get_double(SECTION, key, default)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(SignalError::invalid(
            SECTION,
            key,
            format!("{key} must be positive"),
        ));
    }
    Ok(value)
}

fn parse_dca_levels(config: &dyn ConfigPort) -> Result<Vec<f64>, SignalError> {
    let raw = config
        .get_string(SECTION, "dca_levels_pct")
        .unwrap_or_else(|| DEFAULT_DCA_LEVELS_PCT.to_string());

    split_list(&raw)
        .map(|entry| match entry.parse::<f64>() {
            Ok(pct) if pct.is_finite() && pct > -100.0 => Ok(pct),
            Ok(_) => Err(SignalError::invalid(
                SECTION,
                "dca_levels_pct",
                format!("offset {entry} must be a finite percentage above -100"),
            )),
            Err(_) => Err(SignalError::invalid(
                SECTION,
                "dca_levels_pct",
                format!("offset {entry} is not a number"),
            )),
        })
        .collect()
}

fn parse_day_scores(config: &dyn ConfigPort) -> Result<(u32, u32), SignalError> {
    let buy = config.get_int(SECTION, "buy_day_score", DEFAULT_BUY_DAY_SCORE)?;
    let sell = config.get_int(SECTION, "sell_day_score", DEFAULT_SELL_DAY_SCORE)?;

    for (key, value) in [("buy_day_score", buy), ("sell_day_score", sell)] {
        if !(0..=100).contains(&value) {
            return Err(SignalError::invalid(
                SECTION,
                key,
                format!("{key} must be between 0 and 100"),
            ));
        }
    }
    if sell >= buy {
        return Err(SignalError::invalid(
            SECTION,
            "sell_day_score",
            "sell_day_score must be below buy_day_score",
        ));
    }
    Ok((buy as u32, sell as u32))
}

fn parse_kline_limit(
    config: &dyn ConfigPort,
    sma_period: usize,
    atr_period: usize,
) -> Result<usize, SignalError> {
    let default = default_kline_limit(sma_period, atr_period);
    let value = config.get_int(SECTION, "kline_limit", default as i64)?;
    let required = PriceSeries::required_len(sma_period, atr_period);
    if value < required as i64 {
        return Err(SignalError::invalid(
            SECTION,
            "kline_limit",
            format!("kline_limit must be at least {required} for the configured periods"),
        ));
    }
    Ok(value as usize)
}
