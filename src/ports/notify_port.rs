//! Message delivery port trait.

use crate::domain::error::SignalError;

pub trait NotifyPort {
    fn deliver(&self, text: &str) -> Result<(), SignalError>;
}
