use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use vcs_sqlmap::MapConfig;
use vcs_sync::RemoteNamesConfig;

/// Settings read from `--config`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub remotenames: RemoteNamesConfig,
    pub sqlmap: MapConfig,
}

impl CliConfig {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("invalid configuration")?;
        config.remotenames.validate()?;
        config.sqlmap.validate()?;
        Ok(config)
    }

    /// Load from `path`, or use defaults when no file was given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                Self::from_toml_str(&text)
                    .with_context(|| format!("loading {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }
}
