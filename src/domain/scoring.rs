//! Composite market score.
//!
//! Four independent observations each map onto a bounded sub-score through
//! fixed step thresholds:
//!
//! | input                     | ceiling |
//! |---------------------------|---------|
//! | ETF 7d net flow (US$m)    | 35      |
//! | stablecoin 7d change (US$)| 30      |
//! | VC funding rounds (7d)    | 15      |
//! | treasury conviction       | 20      |
//!
//! The composite is their sum, bounded to 0..=100.

use std::fmt;

pub const ETF_MAX: u32 = 35;
pub const STABLE_MAX: u32 = 30;
pub const VC_MAX: u32 = 15;
pub const TREASURY_MAX: u32 = 20;

/// Half-width of the neutral stablecoin band, in US$.
const STABLE_NEUTRAL_BAND_USD: f64 = 5e8;

pub fn score_etf_flow(net_flow_musd: f64) -> u32 {
    if net_flow_musd >= 1000.0 {
        35
    } else if net_flow_musd >= 250.0 {
        25
    } else if net_flow_musd > -250.0 {
        15
    } else if net_flow_musd > -1000.0 {
        5
    } else {
        0
    }
}

/// A flat week (exactly zero) counts as inflow. The neutral band only
/// catches small outflows.
pub fn score_stablecoin_change(change_usd_7d: f64) -> u32 {
    if change_usd_7d >= 0.0 {
        30
    } else if change_usd_7d.abs() < STABLE_NEUTRAL_BAND_USD {
        15
    } else {
        0
    }
}

pub fn score_vc_count(rounds_7d: u32) -> u32 {
    match rounds_7d {
        n if n > 10 => 15,
        5..=10 => 10,
        _ => 5,
    }
}

/// Expected inputs are 0 (selling), 10 (no news), 20 (new buy); anything else is clamped.
pub fn score_treasury(points: i64) -> u32 {
    points.clamp(0, TREASURY_MAX as i64) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub etf: u32,
    pub stable: u32,
    pub vc: u32,
    pub treasury: u32,
    pub total: u32,
}

pub fn total_score(
    etf_flow_musd: f64,
    stable_7d_change_usd: f64,
    vc_7d_count: u32,
    treasury_points: i64,
) -> (u32, ScoreBreakdown) {
    let etf = score_etf_flow(etf_flow_musd);
    let stable = score_stablecoin_change(stable_7d_change_usd);
    let vc = score_vc_count(vc_7d_count);
    let treasury = score_treasury(treasury_points);
    let total = etf + stable + vc + treasury;

    (
        total,
        ScoreBreakdown {
            etf,
            stable,
            vc,
            treasury,
            total,
        },
    )
}

/// Accumulation zone read straight off the composite score. Informational;
/// trade plans are gated by the day verdict instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentZone {
    BuyZone,
    Accumulate,
    Neutral,
    RiskOff,
}

impl SentimentZone {
    pub fn from_score(total: u32) -> Self {
        match total {
            75.. => SentimentZone::BuyZone,
            55..=74 => SentimentZone::Accumulate,
            35..=54 => SentimentZone::Neutral,
            _ => SentimentZone::RiskOff,
        }
    }
}

impl fmt::Display for SentimentZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SentimentZone::BuyZone => "BUY ZONE (DCA / add exposure)",
            SentimentZone::Accumulate => "ACCUMULATE (build slowly)",
            SentimentZone::Neutral => "HOLD / NEUTRAL",
            SentimentZone::RiskOff => "RISK OFF (reduce / protect)",
        };
        f.write_str(label)
    }
}
