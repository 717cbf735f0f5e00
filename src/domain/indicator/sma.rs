//! Simple Moving Average.
//!
//! SMA(n) = mean of the last n closing prices.

use crate::domain::error::SignalError;
use crate::domain::indicator::IndicatorType;

pub fn simple_moving_average(closes: &[f64], period: usize) -> Result<f64, SignalError> {
    if period == 0 || closes.len() < period {
        return Err(SignalError::InsufficientData {
            indicator: IndicatorType::Sma(period).to_string(),
            have: closes.len(),
            need: period.max(1),
        });
    }

    let window = &closes[closes.len() - period..];
    Ok(window.iter().sum::<f64>() / period as f64)
}
