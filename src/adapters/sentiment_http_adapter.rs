//! Network-backed sentiment observations.
//!
//! - ETF flow: bold.report combined latest values; 7d BTC fund flow times BTC price
//! - Stablecoins: DefiLlama total circulating history, falling back to the
//!   current stablecoin list (change reported as zero)
//! - VC funding: distinct recent round dates scraped from cryptorank
//! - Treasury: manual, from the `[sentiment]` config section

use crate::adapters::http;
use crate::domain::error::SignalError;
use crate::ports::sentiment_port::{SentimentPort, StablecoinLiquidity};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, warn};

pub const ETF_FLOW_URL: &str = "https://bold.report/api/v1/combined/all-latest.json";
pub const STABLECOIN_CHART_URLS: [&str; 2] = [
    "https://stablecoins.llama.fi/stablecoincharts/all",
    "https://api.llama.fi/stablecoins/stablecoincharts/all",
];
pub const STABLECOIN_LIST_URLS: [&str; 2] = [
    "https://stablecoins.llama.fi/stablecoins/stablecoins",
    "https://api.llama.fi/stablecoins/stablecoins",
];
pub const VC_FUNDING_URL: &str = "https://cryptorank.io/funding-rounds";

const WEEK_SECS: i64 = 7 * 24 * 3600;
/// Responses shorter than this are treated as broken.
const MIN_SERIES_ENTRIES: usize = 10;
const MIN_CHART_POINTS: usize = 8;

pub struct HttpSentimentAdapter {
    client: reqwest::blocking::Client,
    treasury_points: i64,
}

impl HttpSentimentAdapter {
    pub fn new(treasury_points: i64) -> Result<Self, SignalError> {
        Ok(Self {
            client: http::build_client()?,
            treasury_points,
        })
    }
}

impl SentimentPort for HttpSentimentAdapter {
    fn etf_net_flow_musd(&self) -> Result<f64, SignalError> {
        let data: Value = http::get_json(&self.client, "etf flow", ETF_FLOW_URL)?;
        parse_etf_flow_musd(&data)
    }

    fn stablecoin_liquidity(&self) -> Result<StablecoinLiquidity, SignalError> {
        for url in STABLECOIN_CHART_URLS {
            match http::get_json::<Value>(&self.client, "stablecoins", url)
                .and_then(|v| parse_stablecoin_chart(&v))
            {
                Ok(liquidity) => return Ok(liquidity),
                Err(e) => warn!(url, error = %e, "stablecoin chart unusable"),
            }
        }

        for url in STABLECOIN_LIST_URLS {
            match http::get_json::<Value>(&self.client, "stablecoins", url)
                .and_then(|v| parse_stablecoin_list(&v))
            {
                Ok(liquidity) => return Ok(liquidity),
                Err(e) => warn!(url, error = %e, "stablecoin list unusable"),
            }
        }

        Err(SignalError::source(
            "stablecoins",
            "endpoints unreachable or returned unexpected format",
        ))
    }

    fn vc_funding_7d_count(&self) -> Result<u32, SignalError> {
        let html = http::get_text(&self.client, "vc funding", VC_FUNDING_URL)?;
        let count = count_recent_funding_dates(&html, Utc::now());
        debug!(count, "vc funding dates");
        Ok(count)
    }

    fn treasury_conviction_points(&self) -> Result<i64, SignalError> {
        Ok(self.treasury_points)
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// 7-day BTC ETF fund flow converted to US$ millions.
pub fn parse_etf_flow_musd(data: &Value) -> Result<f64, SignalError> {
    let field = |key: &str| {
        data.get(key)
            .and_then(number)
            .ok_or_else(|| SignalError::source("etf flow", format!("missing {key}")))
    };
    let flow_btc_7d = field("btc-ff-culm7day")?;
    let btc_price_usd = field("btc-price")?;
    Ok(flow_btc_7d * btc_price_usd / 1e6)
}

/// Latest total and change against the point nearest to one week earlier.
pub fn parse_stablecoin_chart(series: &Value) -> Result<StablecoinLiquidity, SignalError> {
    let entries = series
        .as_array()
        .filter(|a| a.len() > MIN_SERIES_ENTRIES)
        .ok_or_else(|| SignalError::source("stablecoins", "chart series missing or too short"))?;

    let mut points: Vec<(i64, f64)> = entries
        .iter()
        .filter_map(|it| {
            let ts = it.get("date").and_then(number)? as i64;
            let total = it.get("totalCirculating")?.get("peggedUSD").and_then(number)?;
            Some((ts, total))
        })
        .collect();
    points.sort_by_key(|p| p.0);

    if points.len() < MIN_CHART_POINTS {
        return Err(SignalError::source(
            "stablecoins",
            format!("only {} usable chart points", points.len()),
        ));
    }

    let (latest_ts, latest_total) = points[points.len() - 1];
    let target_ts = latest_ts - WEEK_SECS;
    let (_, week_ago_total) = points
        .iter()
        .copied()
        .min_by_key(|(ts, _)| (ts - target_ts).abs())
        .unwrap_or((latest_ts, latest_total));

    Ok(StablecoinLiquidity {
        total_usd: latest_total,
        change_7d_usd: latest_total - week_ago_total,
    })
}

/// Sum of current market caps; `price * circulating` when the cap is absent.
pub fn parse_stablecoin_list(coins: &Value) -> Result<StablecoinLiquidity, SignalError> {
    let entries = coins
        .as_array()
        .filter(|a| a.len() > MIN_SERIES_ENTRIES)
        .ok_or_else(|| SignalError::source("stablecoins", "coin list missing or too short"))?;

    let total: f64 = entries
        .iter()
        .filter_map(|c| {
            if let Some(mcap) = c.get("mcap").and_then(number) {
                return Some(mcap);
            }
            let price = c.get("price").and_then(number)?;
            let circulating = c.get("circulating").and_then(number)?;
            Some(price * circulating)
        })
        .sum();

    if total <= 0.0 {
        return Err(SignalError::source("stablecoins", "coin list has no market caps"));
    }

    Ok(StablecoinLiquidity {
        total_usd: total,
        change_7d_usd: 0.0,
    })
}

/// Counts distinct `Mon D, YYYY` dates in the page text that fall within the
/// last seven days of `now`.
pub fn count_recent_funding_dates(html: &str, now: DateTime<Utc>) -> u32 {
    let text = strip_tags(html);
    let words: Vec<&str> = text.split_whitespace().collect();
    // exact instant, not a calendar date: a page date counts from its UTC midnight
    let cutoff = now - Duration::days(7);

    let dates: BTreeSet<NaiveDate> = words
        .windows(3)
        .filter_map(|w| parse_month_day_year(w[0], w[1], w[2]))
        .collect();

    dates
        .into_iter()
        .filter(|d| d.and_hms_opt(0, 0, 0).is_some_and(|dt| dt.and_utc() >= cutoff))
        .count() as u32
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn parse_month_day_year(month: &str, day: &str, year: &str) -> Option<NaiveDate> {
    // "Jan" may be glued to preceding text, as in "Raised$5MJan"
    let month = MONTHS.iter().find(|m| month.ends_with(*m))?;

    let day = day.strip_suffix(',')?;
    if day.is_empty() || day.len() > 2 || !day.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year = year.get(..4)?;
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    NaiveDate::parse_from_str(&format!("{month} {day}, {year}"), "%b %d, %Y").ok()
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn chart(points: &[(i64, f64)]) -> Value {
        Value::Array(
            points
                .iter()
                .map(|(ts, total)| {
                    json!({"date": ts.to_string(), "totalCirculating": {"peggedUSD": total}})
                })
                .collect(),
        )
    }

    #[test]
    fn etf_flow_converts_btc_to_musd() {
        let data = json!({"btc-ff-culm7day": 1500.0, "btc-price": "60000", "eth-price": 3000});
        assert_eq!(parse_etf_flow_musd(&data).unwrap(), 90.0);
    }

    #[test]
    fn etf_flow_missing_field_fails() {
        let err = parse_etf_flow_musd(&json!({"btc-price": 60000})).unwrap_err();
        assert!(err.to_string().contains("btc-ff-culm7day"));
    }

    #[test]
    fn stablecoin_chart_uses_point_nearest_a_week_ago() {
        let day = 24 * 3600;
        let points: Vec<(i64, f64)> = (0..12).map(|i| (i * day, 100e9 + i as f64 * 1e9)).collect();
        let liq = parse_stablecoin_chart(&chart(&points)).unwrap();
        // latest day 11 (111e9) vs day 4 (104e9)
        assert_eq!(liq.total_usd, 111e9);
        assert_eq!(liq.change_7d_usd, 7e9);
    }

    #[test]
    fn stablecoin_chart_sorts_unordered_points() {
        let day = 24 * 3600;
        let mut points: Vec<(i64, f64)> = (0..12).map(|i| (i * day, 100e9 - i as f64 * 1e9)).collect();
        points.reverse();
        let liq = parse_stablecoin_chart(&chart(&points)).unwrap();
        assert_eq!(liq.total_usd, 89e9);
        assert_eq!(liq.change_7d_usd, -7e9);
    }

    #[test]
    fn stablecoin_chart_too_short_fails() {
        let points: Vec<(i64, f64)> = (0..5).map(|i| (i, 1.0)).collect();
        assert!(parse_stablecoin_chart(&chart(&points)).is_err());
        assert!(parse_stablecoin_chart(&json!({"error": "rate limited"})).is_err());
    }

    #[test]
    fn stablecoin_chart_skips_malformed_entries() {
        let day = 24 * 3600;
        let mut entries: Vec<Value> = (0..3).map(|_| json!({"date": null})).collect();
        entries.extend((0..9).map(|i| {
            json!({"date": i * day, "totalCirculating": {"peggedUSD": 10.0 + i as f64}})
        }));
        let liq = parse_stablecoin_chart(&Value::Array(entries)).unwrap();
        assert_eq!(liq.total_usd, 18.0);
        assert_eq!(liq.change_7d_usd, 7.0);
    }

    #[test]
    fn stablecoin_list_sums_caps_with_fallback() {
        let mut coins: Vec<Value> = (0..10).map(|_| json!({"mcap": 1e9})).collect();
        coins.push(json!({"price": 1.0, "circulating": 5e8}));
        coins.push(json!({"name": "no data"}));
        let liq = parse_stablecoin_list(&Value::Array(coins)).unwrap();
        assert_eq!(liq.total_usd, 10.5e9);
        assert_eq!(liq.change_7d_usd, 0.0);
    }

    #[test]
    fn stablecoin_list_without_caps_fails() {
        let coins: Vec<Value> = (0..12).map(|_| json!({"name": "x"})).collect();
        assert!(parse_stablecoin_list(&Value::Array(coins)).is_err());
    }

    #[test]
    fn funding_dates_within_a_week_are_counted_once() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let html = r#"
            <table>
              <tr><td>Alpha</td><td>Mar 14, 2024</td></tr>
              <tr><td>Beta</td><td>Mar 14, 2024</td></tr>
              <tr><td>Gamma</td><td>Mar 9, 2024</td></tr>
              <tr><td>Delta</td><td>Mar 8, 2024</td></tr>
              <tr><td>Old</td><td>Feb 1, 2024</td></tr>
            </table>"#;
        // cutoff 2024-03-08T12:00 → Mar 14 and Mar 9 qualify
        assert_eq!(count_recent_funding_dates(html, now), 2);
    }

    #[test]
    fn funding_dates_ignore_non_dates() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let html = "<p>January 14, 2024</p><p>Mar 144, 2024</p><p>Mar 14 2024</p><p>Mar 30, 2024</p>";
        // only "Mar 30, 2024" parses; it lies after the cutoff
        assert_eq!(count_recent_funding_dates(html, now), 1);
    }

    #[test]
    fn funding_dates_across_tags() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let html = "<span>Mar</span><span>12,</span><span>2024</span>";
        assert_eq!(count_recent_funding_dates(html, now), 1);
    }

    #[test]
    fn strip_tags_replaces_markup_with_space() {
        assert_eq!(strip_tags("<b>a</b>b").split_whitespace().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
