use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};

/// Tuning for SQL-backed mappings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Rows fetched per cursor when iterating keys or items.
    pub page_size: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { page_size: 256 }
    }
}

impl MapConfig {
    pub fn validate(&self) -> MapResult<()> {
        if self.page_size == 0 {
            return Err(MapError::InvalidConfig("page_size must be at least 1".into()));
        }
        Ok(())
    }
}
