use crate::error::{NestError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_TIMEOUT_MS: u64 = 3000;
const DEFAULT_FILE_MODE: u32 = 0o600;

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV: &str = "NESTKV_CONFIG";

/// Configuration for nestkv, stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NestConfig {
    /// How long a writer waits for the database lock, 0 waits forever
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub read_only: bool,

    /// Permission bits for database files written by nestkv
    #[serde(default = "default_file_mode")]
    pub file_mode: u32,

    /// Refuse to create missing databases, even for `add` and `set`
    #[serde(default)]
    pub must_exist: bool,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_file_mode() -> u32 {
    DEFAULT_FILE_MODE
}

impl Default for NestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            read_only: false,
            file_mode: DEFAULT_FILE_MODE,
            must_exist: false,
        }
    }
}

impl NestConfig {
    /// Default location: `config.json` in the platform config dir.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "nestkv", "nestkv")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }

    /// Load config from `path`, or return defaults if it does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(NestError::Io)?;
        let config: NestConfig =
            serde_json::from_str(&content).map_err(NestError::Serialization)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(NestError::Io)?;
            }
        }

        let content = serde_json::to_string_pretty(self).map_err(NestError::Serialization)?;
        fs::write(path, content).map_err(NestError::Io)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
