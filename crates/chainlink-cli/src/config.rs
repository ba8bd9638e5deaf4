use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "chainlink.toml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Chain snapshot file used by every command except `demo`.
    pub chain_path: PathBuf,
    /// Number of hex characters shown for hashes in text output.
    pub hash_preview_len: usize,
    /// Colored text output.
    pub color: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            chain_path: PathBuf::from("chainlink-chain.json"),
            hash_preview_len: 16,
            color: true,
        }
    }
}

impl CliConfig {
    /// Load from an explicit file, or from `chainlink.toml` if it exists,
    /// or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    Self::from_file(implicit)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self =
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }
}
