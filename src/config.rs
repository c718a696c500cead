use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const APP_DIR_NAME: &str = "rolodex";
pub const CONTACTS_FILE_NAME: &str = "contacts.json";
pub const CONFIG_FILE_NAME: &str = "config.json";

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join(APP_DIR_NAME)
}

fn default_theme() -> String {
    "Light".to_string()
}

fn default_themes() -> Vec<String> {
    vec!["Light".into(), "Dark".into(), "Blue".into(), "Warm".into()]
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write config `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `contacts.json`.
    pub data_directory: PathBuf,
    pub theme: String,
    pub themes: Vec<String>,
    pub debug_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_directory: default_data_dir(),
            theme: default_theme(),
            themes: default_themes(),
            debug_logging: false,
        }
    }
}

impl Config {
    /// Location of the config file under the per-user config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.normalize();
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is absent or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default config: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        json.push('\n');
        std::fs::write(path, json).map_err(io_err)
    }

    pub fn contacts_path(&self) -> PathBuf {
        self.data_directory.join(CONTACTS_FILE_NAME)
    }

    pub fn has_theme(&self, name: &str) -> bool {
        self.themes.iter().any(|t| t == name)
    }

    /// Ensure the data directory exists.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_directory)
    }

    // A hand-edited file may drop the theme list or name a theme that isn't in it.
    fn normalize(&mut self) {
        if self.themes.is_empty() {
            self.themes = default_themes();
        }
        if !self.has_theme(&self.theme) {
            log::warn!("Unknown theme {:?} in config, using {}", self.theme, self.themes[0]);
            self.theme = self.themes[0].clone();
        }
    }
}
