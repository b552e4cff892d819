use crate::config::root_dir;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file, created on first start.
    pub path: String,
    pub max_connections: Option<u32>,
    pub busy_timeout_ms: Option<u64>,
    pub vacuum_on_clear: Option<bool>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "pings.db".to_string(),
            max_connections: None,
            busy_timeout_ms: None,
            vacuum_on_clear: None,
        }
    }
}

impl StorageConfig {
    pub fn parse_path(&self) -> PathBuf {
        let path = std::path::Path::new(&self.path).to_path_buf();
        if path.is_absolute() {
            path
        } else {
            root_dir().join(path)
        }
    }
    pub fn get_max_connections(&self) -> u32 {
        self.max_connections.unwrap_or(8).max(1)
    }
    pub fn get_busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms.unwrap_or(5_000))
    }
    pub fn get_vacuum_on_clear(&self) -> bool {
        self.vacuum_on_clear.unwrap_or(true)
    }
}
