//! Core domain types and logic. Pure and synchronous; no I/O.

pub mod ohlcv;
pub mod indicator;
pub mod scoring;
pub mod verdict;
pub mod plan;
pub mod config;
pub mod cycle;
pub mod error;
