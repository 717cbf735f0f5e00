//! Concrete adapter implementations for ports.

pub mod config_sentiment_adapter;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod stdout_notifier;
pub mod text_report;

#[cfg(feature = "http")]
pub mod binance_adapter;
#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "http")]
pub mod sentiment_http_adapter;
#[cfg(feature = "http")]
pub mod telegram_adapter;
