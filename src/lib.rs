//! daysignal: daily crypto market signal generator.
//!
//! Hexagonal architecture: scoring and plan logic in [`domain`], port traits
//! in [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod logging;
