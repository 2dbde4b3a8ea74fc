use crate::catalog::DEFAULT_ELIGIBLE_STATUS;
use crate::store::DEFAULT_MAP_COLOR;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const HTTP_ADDR_ENV: &str = "INTERVENTION_TOOL_HTTP_ADDR";
pub const DATA_PATH_ENV: &str = "INTERVENTION_TOOL_DATA";
pub const CONFIG_PATH_ENV: &str = "INTERVENTION_TOOL_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Unit status treated as "ready to assign".
    pub eligible_status: String,
    /// Marker colour given to newly assigned units.
    pub default_map_color: String,
    pub http_addr: String,
    /// JSON file the host loads the board from and saves it to.
    pub data_path: Option<PathBuf>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            eligible_status: DEFAULT_ELIGIBLE_STATUS.to_string(),
            default_map_color: DEFAULT_MAP_COLOR.to_string(),
            http_addr: "0.0.0.0:3000".to_string(),
            data_path: None,
        }
    }
}

impl BoardConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads the file named by `INTERVENTION_TOOL_CONFIG` when set, then
    /// applies the individual environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Applies environment-style overrides looked up through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(HTTP_ADDR_ENV).filter(|v| !v.trim().is_empty()) {
            self.http_addr = addr;
        }
        if let Some(path) = lookup(DATA_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            self.data_path = Some(PathBuf::from(path));
        }
        self
    }
}
