//! Per-coin trade plan derivation.
//!
//! A plan is gated first by the day verdict and then by the coin's own trend:
//!
//! | verdict  | trend | plan                                   |
//! |----------|-------|----------------------------------------|
//! | BuyDay   | Up    | Long (DCA ladder, ATR stop, R target)  |
//! | BuyDay   | Down  | Skip                                   |
//! | SellDay  | Down  | HoldReduce (risk-off, no shorting)     |
//! | SellDay  | Up    | HoldReduce (trend not down)            |
//! | HoldDay  | any   | Hold                                   |
//!
//! No rounding happens here.

use crate::domain::indicator::{IndicatorSnapshot, Trend};
use crate::domain::verdict::DayVerdict;

pub const REASON_TREND_NOT_UP: &str = "trend not up";
pub const REASON_TREND_NOT_DOWN: &str = "trend not down";
pub const REASON_RISK_OFF: &str = "risk-off guidance, no shorting";

#[derive(Debug, Clone, PartialEq)]
pub struct RiskConfig {
    pub atr_multiplier: f64,
    pub reward_multiplier: f64,
    /// Percentage offsets from the entry price, kept in configured order.
    pub dca_levels_pct: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TradePlan {
    Skip {
        reason: String,
    },
    HoldReduce {
        reason: String,
    },
    Long {
        entry_ladder: Vec<f64>,
        stop_loss: f64,
        take_profit: f64,
    },
    Hold,
}

pub fn build_plan(verdict: DayVerdict, snapshot: &IndicatorSnapshot, risk: &RiskConfig) -> TradePlan {
    match (verdict, snapshot.trend) {
        (DayVerdict::BuyDay, Trend::Down) => TradePlan::Skip {
            reason: REASON_TREND_NOT_UP.to_string(),
        },
        (DayVerdict::SellDay, Trend::Up) => TradePlan::HoldReduce {
            reason: REASON_TREND_NOT_DOWN.to_string(),
        },
        (DayVerdict::BuyDay, Trend::Up) => long_plan(snapshot, risk),
        (DayVerdict::SellDay, Trend::Down) => TradePlan::HoldReduce {
            reason: REASON_RISK_OFF.to_string(),
        },
        (DayVerdict::HoldDay, _) => TradePlan::Hold,
    }
}

fn long_plan(snapshot: &IndicatorSnapshot, risk: &RiskConfig) -> TradePlan {
    let entry = snapshot.entry_price;
    let stop_loss = entry - risk.atr_multiplier * snapshot.atr_value;
    let take_profit = entry + risk.reward_multiplier * (entry - stop_loss);
    let entry_ladder = risk
        .dca_levels_pct
        .iter()
        .map(|pct| entry * (1.0 + pct / 100.0))
        .collect();

    TradePlan::Long {
        entry_ladder,
        stop_loss,
        take_profit,
    }
}
