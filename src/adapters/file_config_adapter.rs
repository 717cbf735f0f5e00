//! INI file configuration adapter.

use crate::domain::error::SignalError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SignalError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| SignalError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, SignalError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| SignalError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// Non-empty string value, trimmed.
    pub fn get_non_empty(&self, section: &str, key: &str) -> Option<String> {
        self.get_string(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, SignalError> {
        match self.config.getint(section, key) {
            Ok(value) => Ok(value.unwrap_or(default)),
            Err(reason) => Err(SignalError::invalid(section, key, reason)),
        }
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, SignalError> {
        match self.config.getfloat(section, key) {
            Ok(value) => Ok(value.unwrap_or(default)),
            Err(reason) => Err(SignalError::invalid(section, key, reason)),
        }
    }
}
