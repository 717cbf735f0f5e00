//! Day classification from the composite score.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayVerdict {
    BuyDay,
    SellDay,
    HoldDay,
}

impl fmt::Display for DayVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DayVerdict::BuyDay => "BUY DAY",
            DayVerdict::SellDay => "SELL / RISK-OFF DAY",
            DayVerdict::HoldDay => "HOLD DAY",
        };
        f.write_str(label)
    }
}

/// `sell_threshold < buy_threshold` is enforced when the config is loaded.
pub fn classify_day(total: u32, buy_threshold: u32, sell_threshold: u32) -> DayVerdict {
    if total >= buy_threshold {
        DayVerdict::BuyDay
    } else if total <= sell_threshold {
        DayVerdict::SellDay
    } else {
        DayVerdict::HoldDay
    }
}
