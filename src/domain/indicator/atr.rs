//! Average True Range.
//!
//! TR[i] = max(H[i] - L[i], |H[i] - C[i-1]|, |L[i] - C[i-1]|) for i >= 1
//! ATR(n) = mean of the last n true ranges (simple average, no Wilder smoothing).

use crate::domain::error::SignalError;
use crate::domain::indicator::IndicatorType;

pub fn average_true_range(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
) -> Result<f64, SignalError> {
    let indicator = IndicatorType::Atr(period).to_string();

    if highs.len() != closes.len() || lows.len() != closes.len() {
        return Err(SignalError::InsufficientData {
            indicator,
            have: highs.len().min(lows.len()).min(closes.len()),
            need: closes.len(),
        });
    }

    let true_ranges = true_ranges(highs, lows, closes);
    if period == 0 || true_ranges.len() < period {
        return Err(SignalError::InsufficientData {
            indicator,
            have: true_ranges.len(),
            need: period.max(1),
        });
    }

    let window = &true_ranges[true_ranges.len() - period..];
    Ok(window.iter().sum::<f64>() / period as f64)
}

fn true_ranges(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    (1..closes.len())
        .map(|i| {
            let prev_close = closes[i - 1];
            let hl = highs[i] - lows[i];
            let hc = (highs[i] - prev_close).abs();
            let lc = (lows[i] - prev_close).abs();
            hl.max(hc).max(lc)
        })
        .collect()
}
