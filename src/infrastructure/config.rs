use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::zed_db::default_database_path;

pub const DEFAULT_EDITOR_COMMAND: &str = "zed";
pub const DEFAULT_WSL_COMMAND: &str = "wsl";
pub const DEFAULT_ICON_PATH: &str = "assets/zed.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    #[serde(default = "default_editor_command")]
    pub editor_command: String,
    #[serde(default = "default_wsl_command")]
    pub wsl_command: String,
    #[serde(default = "default_icon_path")]
    pub icon_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_log: Option<PathBuf>,
}

fn default_editor_command() -> String {
    DEFAULT_EDITOR_COMMAND.to_string()
}

fn default_wsl_command() -> String {
    DEFAULT_WSL_COMMAND.to_string()
}

fn default_icon_path() -> String {
    DEFAULT_ICON_PATH.to_string()
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            editor_command: default_editor_command(),
            wsl_command: default_wsl_command(),
            icon_path: default_icon_path(),
            event_log: None,
        }
    }
}

impl PluginConfig {
    /// Configured override, then the editor's own location.
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .or_else(default_database_path)
            .unwrap_or_else(|| PathBuf::from("db.sqlite"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: PluginConfig,
}

fn config_directory() -> Option<PathBuf> {
    if let Some(path) = dirs::config_dir() {
        return Some(path.join("zed-workspaces"));
    }

    dirs::home_dir().map(|path| path.join(".config").join("zed-workspaces"))
}

pub fn config_path() -> Option<PathBuf> {
    config_directory().map(|path| path.join("config.toml"))
}

pub fn load() -> Result<LoadedConfig, String> {
    let path = config_path().ok_or_else(|| "cannot resolve config path".to_string())?;
    let config = load_from_path(&path)?;
    Ok(LoadedConfig { path, config })
}

pub fn load_from_path(path: &Path) -> Result<PluginConfig, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Ok(PluginConfig::default());
        }
        Err(error) => return Err(format!("config read failed: {error}")),
    };

    toml::from_str::<PluginConfig>(&raw).map_err(|error| format!("config parse failed: {error}"))
}
