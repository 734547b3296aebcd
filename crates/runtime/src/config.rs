//! Reader configuration
//!
//! ```toml
//! mode = "standard"
//! channel_capacity = 32
//! max_frame_len = 4096
//! ```

use crate::constants::{
    DEFAULT_BUFFER_CAPACITY, DEFAULT_CHANNEL_CAPACITY, DEFAULT_MAX_FRAME_LEN, MAX_BUFFER_CAPACITY,
    MAX_CHANNEL_CAPACITY, MAX_FRAME_LEN_LIMIT,
};
use core_types::ProtocolMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings for [`spawn_reader`](crate::spawn_reader). Missing keys take their
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub mode: ProtocolMode,
    /// Frames buffered between the reader thread and its consumer.
    pub channel_capacity: usize,
    /// Initial size of the frame body buffer, in bytes.
    pub buffer_capacity: usize,
    /// Longest frame body kept while waiting for ETX, in bytes.
    pub max_frame_len: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            mode: ProtocolMode::Historical,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

impl ReaderConfig {
    pub fn new(mode: ProtocolMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity > MAX_CHANNEL_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "channel_capacity {} exceeds {}",
                self.channel_capacity, MAX_CHANNEL_CAPACITY
            )));
        }
        if self.buffer_capacity == 0 || self.buffer_capacity > MAX_BUFFER_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "buffer_capacity {} must be between 1 and {}",
                self.buffer_capacity, MAX_BUFFER_CAPACITY
            )));
        }
        if self.max_frame_len == 0 || self.max_frame_len > MAX_FRAME_LEN_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_frame_len {} must be between 1 and {}",
                self.max_frame_len, MAX_FRAME_LEN_LIMIT
            )));
        }
        Ok(())
    }
}
