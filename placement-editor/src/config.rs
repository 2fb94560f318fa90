use crate::error::ConfigError;
use crate::result::ConfigResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SETTINGS_PATH: &str = "./settings.json";

/// Settings shared by the editor and the viewer. Both processes are expected to
/// point at the same document and the same storage directory.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Local path or http(s) URL of the config document.
    pub document: String,
    pub storage_dir: PathBuf,
    pub status_interval_ms: u64,
    pub connection_timeout_ms: u64,
    /// Let export write the document file directly instead of relying on the
    /// user to paste the exported text back. Only applies to local documents.
    pub write_back: bool,
    /// Program and arguments that receive exported text on stdin.
    pub clipboard_command: Option<Vec<String>>,
    pub viewer_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document: "./config/placement.json".to_string(),
            storage_dir: default_storage_dir(),
            status_interval_ms: 2000,
            connection_timeout_ms: 5000,
            write_back: false,
            clipboard_command: None,
            viewer_port: 3693,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return create_default_config(path);
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        serde_json::from_str(&text).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }
}

pub fn create_default_config(path: &Path) -> ConfigResult<Config> {
    let config = Config::default();
    // Serializing a plain struct of strings and numbers cannot fail.
    let config_str = serde_json::to_vec_pretty(&config)
        .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    std::fs::write(path, config_str).map_err(|e| ConfigError::WriteDefault(path.to_path_buf(), e))?;
    Ok(config)
}

fn default_storage_dir() -> PathBuf {
    match dirs::data_local_dir() {
        Some(dir) => dir.join("truck-placement").join("storage"),
        None => PathBuf::from("./storage"),
    }
}
