//! Port traits at the boundary between the signal core and the outside world.

pub mod config_port;
pub mod market_port;
pub mod notify_port;
pub mod sentiment_port;
