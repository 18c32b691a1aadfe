//! Engine configuration.
//!
//! Every field has a default, so an empty document is a valid config.
//!
//! ```rust
//! use waypoint::config::{EngineConfig, IdFormat};
//!
//! let config = EngineConfig::from_json(r#"{ "id_format": "simple", "store_shards": 8 }"#).unwrap();
//! assert_eq!(config.id_format, IdFormat::Simple);
//! assert_eq!(config.store_shards, Some(8));
//! ```

use crate::store::InMemoryStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while loading or checking a config.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("store_shards must be a power of two greater than 1, got {shards}")]
    InvalidShardCount { shards: usize },

    #[error("Failed to parse engine config: {0}")]
    Parse(String),
}

/// How generated identifiers are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdFormat {
    /// `67e55044-10b1-426f-9247-bb680e5fe0c8`
    #[default]
    Hyphenated,
    /// `67e5504410b1426f9247bb680e5fe0c8`
    Simple,
}

impl IdFormat {
    /// A fresh random (v4) identifier in this format.
    pub fn generate(self) -> String {
        let id = Uuid::new_v4();
        match self {
            Self::Hyphenated => id.hyphenated().to_string(),
            Self::Simple => id.simple().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rendering of ids the engine assigns
    pub id_format: IdFormat,
    /// Initial capacity of each store
    pub store_capacity: usize,
    /// Shard count of each store; `None` lets the map choose
    pub store_shards: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            id_format: IdFormat::Hyphenated,
            store_capacity: 0,
            store_shards: None,
        }
    }
}

impl EngineConfig {
    /// Parse and check a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(shards) = self.store_shards {
            if shards < 2 || !shards.is_power_of_two() {
                return Err(ConfigError::InvalidShardCount { shards });
            }
        }
        Ok(())
    }

    /// An empty store sized according to this config.
    ///
    /// Call [`EngineConfig::validate`] first; an invalid shard count panics
    /// inside the map constructor.
    pub(crate) fn build_store<T>(&self) -> InMemoryStore<T> {
        match self.store_shards {
            Some(shards) => InMemoryStore::with_capacity_and_shards(self.store_capacity, shards),
            None => InMemoryStore::with_capacity(self.store_capacity),
        }
    }
}
