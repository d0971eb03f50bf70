use super::compression::CompressionAlgorithm;
use super::entry::BlockHeight;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Configuration shared by both contract stores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Block height mutations are stamped with until the clock advances
    pub genesis_height: BlockHeight,
    /// Compression applied to snapshot payloads
    pub snapshot_compression: CompressionAlgorithm,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            genesis_height: 1,
            snapshot_compression: CompressionAlgorithm::default(),
        }
    }
}

impl LedgerConfig {
    /// Parses and validates a JSON config; missing fields take defaults.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: LedgerConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Height 0 is reserved for records that were never touched
        if self.genesis_height == 0 {
            return Err(ConfigError::Validation {
                message: "genesis_height must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}
