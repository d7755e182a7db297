use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// Settings for remote name tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteNamesConfig {
    /// Directory under the repository metadata area holding the files.
    pub dir_name: String,
    /// Record remote branch heads on pull.
    pub branches: bool,
    /// Record remote bookmarks on pull.
    pub bookmarks: bool,
}

impl Default for RemoteNamesConfig {
    fn default() -> Self {
        Self {
            dir_name: "remotenames".into(),
            branches: true,
            bookmarks: true,
        }
    }
}

impl RemoteNamesConfig {
    /// Parse from TOML; missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> SyncResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| SyncError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SyncResult<()> {
        if self.dir_name.is_empty()
            || Path::new(&self.dir_name).components().count() != 1
            || self.dir_name == ".."
        {
            return Err(SyncError::Config(format!(
                "dir_name must be a single path component, got {:?}",
                self.dir_name
            )));
        }
        Ok(())
    }
}
