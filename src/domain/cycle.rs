//! One evaluation cycle: observations in, scored and planned report out.
//!
//! Collaborator failures never abort the cycle. A failed sentiment input is
//! replaced by its neutral value and recorded as a [`Degradation`]; a coin
//! whose data cannot be fetched or is too short is reported as failed.

use crate::domain::config::SignalConfig;
use crate::domain::error::SignalError;
use crate::domain::indicator::IndicatorSnapshot;
use crate::domain::plan::{build_plan, TradePlan};
use crate::domain::scoring::{total_score, ScoreBreakdown, SentimentZone};
use crate::domain::verdict::{classify_day, DayVerdict};
use crate::ports::market_port::MarketDataPort;
use crate::ports::sentiment_port::{SentimentPort, StablecoinLiquidity};
use tracing::{error, info, warn};

pub const NEUTRAL_ETF_FLOW_MUSD: f64 = 0.0;
pub const NEUTRAL_STABLECOIN: StablecoinLiquidity = StablecoinLiquidity {
    total_usd: 0.0,
    change_7d_usd: 0.0,
};
pub const NEUTRAL_VC_COUNT: u32 = 0;
pub const NEUTRAL_TREASURY_POINTS: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentInputs {
    pub etf_net_flow_musd: f64,
    pub stablecoin_total_usd: f64,
    pub stablecoin_7d_change_usd: f64,
    pub vc_funding_7d_count: u32,
    pub treasury_conviction_points: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Degradation {
    pub input: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoinOutcome {
    Planned {
        snapshot: IndicatorSnapshot,
        plan: TradePlan,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoinReport {
    pub symbol: String,
    pub outcome: CoinOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalReport {
    pub inputs: SentimentInputs,
    pub breakdown: ScoreBreakdown,
    pub verdict: DayVerdict,
    pub zone: SentimentZone,
    pub coins: Vec<CoinReport>,
    pub degraded: Vec<Degradation>,
}

impl SignalReport {
    pub fn failed_coins(&self) -> impl Iterator<Item = &CoinReport> {
        self.coins
            .iter()
            .filter(|c| matches!(c.outcome, CoinOutcome::Failed { .. }))
    }
}

pub fn run_cycle(
    config: &SignalConfig,
    market: &dyn MarketDataPort,
    sentiment: &dyn SentimentPort,
) -> SignalReport {
    let mut degraded = Vec::new();
    let inputs = gather_inputs(sentiment, &mut degraded);

    let (total, breakdown) = total_score(
        inputs.etf_net_flow_musd,
        inputs.stablecoin_7d_change_usd,
        inputs.vc_funding_7d_count,
        inputs.treasury_conviction_points,
    );
    let verdict = classify_day(total, config.buy_day_score, config.sell_day_score);
    let zone = SentimentZone::from_score(total);
    info!(
        total,
        etf = breakdown.etf,
        stable = breakdown.stable,
        vc = breakdown.vc,
        treasury = breakdown.treasury,
        verdict = %verdict,
        "scored sentiment"
    );

    let coins = config
        .coins
        .iter()
        .map(|symbol| evaluate_coin(config, market, verdict, symbol))
        .collect();

    SignalReport {
        inputs,
        breakdown,
        verdict,
        zone,
        coins,
        degraded,
    }
}

pub fn evaluate_coin(
    config: &SignalConfig,
    market: &dyn MarketDataPort,
    verdict: DayVerdict,
    symbol: &str,
) -> CoinReport {
    let outcome = match snapshot_for(config, market, symbol) {
        Ok(snapshot) => {
            let plan = build_plan(verdict, &snapshot, &config.risk);
            info!(symbol, trend = %snapshot.trend, ?plan, "planned coin");
            CoinOutcome::Planned { snapshot, plan }
        }
        Err(e) => {
            error!(symbol, error = %e, "coin evaluation failed");
            CoinOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    CoinReport {
        symbol: symbol.to_string(),
        outcome,
    }
}

fn snapshot_for(
    config: &SignalConfig,
    market: &dyn MarketDataPort,
    symbol: &str,
) -> Result<IndicatorSnapshot, SignalError> {
    let series = market.fetch_daily_bars(symbol, config.kline_limit)?;
    let entry_price = market.last_price(symbol)?;
    IndicatorSnapshot::compute(
        symbol,
        &series,
        entry_price,
        config.sma_period,
        config.atr_period,
    )
}

fn gather_inputs(sentiment: &dyn SentimentPort, degraded: &mut Vec<Degradation>) -> SentimentInputs {
    let etf_net_flow_musd = or_neutral(
        "etf flow",
        sentiment.etf_net_flow_musd(),
        NEUTRAL_ETF_FLOW_MUSD,
        degraded,
    );
    let liquidity = or_neutral(
        "stablecoin liquidity",
        sentiment.stablecoin_liquidity(),
        NEUTRAL_STABLECOIN,
        degraded,
    );
    let vc_funding_7d_count = or_neutral(
        "vc funding",
        sentiment.vc_funding_7d_count(),
        NEUTRAL_VC_COUNT,
        degraded,
    );
    let treasury_conviction_points = or_neutral(
        "treasury conviction",
        sentiment.treasury_conviction_points(),
        NEUTRAL_TREASURY_POINTS,
        degraded,
    );

    SentimentInputs {
        etf_net_flow_musd,
        stablecoin_total_usd: liquidity.total_usd,
        stablecoin_7d_change_usd: liquidity.change_7d_usd,
        vc_funding_7d_count,
        treasury_conviction_points,
    }
}

fn or_neutral<T>(
    input: &str,
    observed: Result<T, SignalError>,
    neutral: T,
    degraded: &mut Vec<Degradation>,
) -> T {
    match observed {
        Ok(value) => value,
        Err(e) => {
            warn!(input, error = %e, "using neutral fallback");
            degraded.push(Degradation {
                input: input.to_string(),
                reason: e.to_string(),
            });
            neutral
        }
    }
}
