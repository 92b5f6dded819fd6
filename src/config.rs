use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domains::routing::BlockingPolicy;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub venue: VenueConfig,
    #[serde(default)]
    pub grid: BlockingPolicy,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueConfig {
    /// Directory holding venue files; see `resolve_data_dir` when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_data_file")]
    pub data_file: String,
    /// World units per grid cell.
    #[serde(default = "default_cell_size")]
    pub cell_size: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Domain log file; console logging when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_data_file() -> String {
    "booths.json".to_string()
}

fn default_cell_size() -> i32 {
    50
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            data_file: default_data_file(),
            cell_size: default_cell_size(),
        }
    }
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Startup loader: a missing file yields the defaults together with the
    /// read error so the caller can report it. Any other failure, including
    /// malformed TOML, is returned as an error.
    pub async fn load_or_default<P: AsRef<Path>>(
        path: P,
    ) -> Result<(Self, Option<anyhow::Error>)> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(content) => {
                let config = Self::from_toml(&content)
                    .with_context(|| format!("parsing {}", path.display()))?;
                Ok((config, None))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let missing = anyhow::Error::new(e).context(format!("reading {}", path.display()));
                Ok((Self::default(), Some(missing)))
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
