//! Plain-text rendering of a [`SignalReport`] for chat delivery.
//!
//! Prices are rounded to two decimals here and nowhere else.

use crate::domain::config::SignalConfig;
use crate::domain::cycle::{CoinOutcome, CoinReport, SignalReport};
use crate::domain::indicator::{IndicatorSnapshot, Trend};
use crate::domain::plan::TradePlan;
use crate::domain::scoring::{ETF_MAX, STABLE_MAX, TREASURY_MAX, VC_MAX};

pub const FOOTER: &str = "Rules-based assistant: confirm manually before trading.";

pub fn format_message(report: &SignalReport, config: &SignalConfig) -> String {
    let b = &report.breakdown;
    let inputs = &report.inputs;
    let mut out = String::new();

    out.push_str(&format!("Crypto Signal: {} ({}/100)\n", report.verdict, b.total));

    out.push_str("\nSentiment\n");
    out.push_str(&format!(
        "- ETF 7d flow: {} US$m\n",
        format_thousands(inputs.etf_net_flow_musd, 1)
    ));
    out.push_str(&format!(
        "- Stablecoin mcap: ${}B\n",
        format_thousands(inputs.stablecoin_total_usd / 1e9, 2)
    ));
    out.push_str(&format!(
        "- Stablecoin 7d: ${}B\n",
        format_thousands(inputs.stablecoin_7d_change_usd / 1e9, 2)
    ));
    out.push_str(&format!(
        "- VC rounds (7d est): {}\n",
        inputs.vc_funding_7d_count
    ));
    out.push_str(&format!("- Zone: {}\n", report.zone));
    out.push_str(&format!(
        "- Breakdown: ETF {}/{} | Stable {}/{} | VC {}/{} | Treasury {}/{}\n",
        b.etf, ETF_MAX, b.stable, STABLE_MAX, b.vc, VC_MAX, b.treasury, TREASURY_MAX
    ));

    if !report.degraded.is_empty() {
        out.push_str("\nDegraded inputs (neutral value used)\n");
        for d in &report.degraded {
            out.push_str(&format!("- {}: {}\n", d.input, d.reason));
        }
    }

    let plans: Vec<String> = report
        .coins
        .iter()
        .map(|coin| format_coin(coin, config))
        .collect();
    out.push_str("\nCoin Plans\n");
    out.push_str(&plans.join("\n\n"));
    out.push_str("\n\n");
    out.push_str(FOOTER);

    out
}

pub fn format_coin(coin: &CoinReport, config: &SignalConfig) -> String {
    match &coin.outcome {
        CoinOutcome::Failed { reason } => format!("{} ⚠️ DATA ERROR: {}", coin.symbol, reason),
        CoinOutcome::Planned { snapshot, plan } => format_plan(snapshot, plan, config),
    }
}

fn format_plan(snapshot: &IndicatorSnapshot, plan: &TradePlan, config: &SignalConfig) -> String {
    let symbol = &snapshot.symbol;
    let sma = config.sma_period;
    let atr_label = format!("ATR{}: {}", config.atr_period, format_thousands(snapshot.atr_value, 2));

    match plan {
        TradePlan::Skip { .. } => format!("{symbol}: SKIP (trend DOWN vs SMA{sma})"),
        TradePlan::HoldReduce { .. } if snapshot.trend == Trend::Up => {
            format!("{symbol}: HOLD/REDUCE (trend not DOWN vs SMA{sma})")
        }
        TradePlan::HoldReduce { .. } => format!(
            "{symbol} 🔴 RISK-OFF\n\
             Trend: DOWN (Close < SMA{sma})\n\
             Action: reduce exposure / tighten stops / avoid new longs\n\
             {atr_label}"
        ),
        TradePlan::Long {
            entry_ladder,
            stop_loss,
            take_profit,
        } => {
            let ladder = entry_ladder
                .iter()
                .map(|p| format_thousands(*p, 2))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "{symbol} 🟢 LONG\n\
                 Entry (DCA): {ladder}\n\
                 SL: {} | TP: {}\n\
                 Trend: UP (Close > SMA{sma}) | {atr_label}",
                format_thousands(*stop_loss, 2),
                format_thousands(*take_profit, 2),
            )
        }
        TradePlan::Hold => format!("{symbol} 🟡 HOLD (no new action)"),
    }
}

/// Fixed-point with `,` thousands separators, e.g. `-1,234.50`.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
