//! Domain error types.

/// Top-level error type for daysignal.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("insufficient data for {indicator}: have {have} values, need {need}")]
    InsufficientData {
        indicator: String,
        have: usize,
        need: usize,
    },

    #[error("{source_name} unavailable: {reason}")]
    Source { source_name: String, reason: String },

    #[error("message delivery failed: {reason}")]
    Delivery { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SignalError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        SignalError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn source(source_name: &str, reason: impl ToString) -> Self {
        SignalError::Source {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<&SignalError> for std::process::ExitCode {
    fn from(err: &SignalError) -> Self {
        let code: u8 = match err {
            SignalError::Io(_) => 1,
            SignalError::ConfigParse { .. }
            | SignalError::ConfigMissing { .. }
            | SignalError::ConfigInvalid { .. } => 2,
            SignalError::Source { .. } | SignalError::Delivery { .. } => 3,
            SignalError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
