use crate::core::{DbError, Result};
use crate::mutation::DEFAULT_MAX_TTL_SECONDS;
use serde::{Deserialize, Serialize};

/// Engine configuration
///
/// Built fluently or read from JSON; missing JSON fields take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Identifier of this node, folded into every session origin so that
    /// writes from different nodes never tie.
    pub node_id: u32,

    /// Largest TTL a statement may carry, in seconds
    pub max_ttl_seconds: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            node_id: 1,
            max_ttl_seconds: DEFAULT_MAX_TTL_SECONDS,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the node identifier
    pub fn node_id(mut self, node_id: u32) -> Self {
        self.node_id = node_id;
        self
    }

    /// Set the TTL ceiling
    pub fn max_ttl_seconds(mut self, seconds: u64) -> Self {
        self.max_ttl_seconds = seconds;
        self
    }

    /// Parse and validate a JSON document
    ///
    /// ```
    /// # use rustcelldb::EngineConfig;
    /// let config = EngineConfig::from_json(r#"{ "node_id": 3 }"#).unwrap();
    /// assert_eq!(config.node_id, 3);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_ttl_seconds == 0 {
            return Err(DbError::InvalidConfig(
                "max_ttl_seconds must be > 0".to_string(),
            ));
        }

        if self.max_ttl_seconds > i64::MAX as u64 / 1_000_000 {
            return Err(DbError::InvalidConfig(format!(
                "max_ttl_seconds {} overflows the microsecond clock",
                self.max_ttl_seconds
            )));
        }

        Ok(())
    }
}
