//! Configuration schema (dbtlineage.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up at the project root
pub const CONFIG_FILE_NAME: &str = "dbtlineage.toml";

fn default_manifest_path() -> PathBuf {
    PathBuf::from("target").join("manifest.json")
}

fn default_project_marker() -> String {
    "dbt_project.yml".to_string()
}

fn default_model_extensions() -> Vec<String> {
    vec!["sql".to_string(), "yml".to_string()]
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Location of the build graph artifact, relative to the project root
    #[serde(default = "default_manifest_path")]
    pub manifest_path: PathBuf,

    /// File whose presence marks a directory as a dbt project
    #[serde(default = "default_project_marker")]
    pub project_marker: String,

    /// File extensions that map to a model name (without the leading dot)
    #[serde(default = "default_model_extensions")]
    pub model_extensions: Vec<String>,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest_path: default_manifest_path(),
            project_marker: default_project_marker(),
            model_extensions: default_model_extensions(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Use `dbtlineage.toml` under `project_root` if present, defaults otherwise
    pub fn discover(project_root: &Path) -> Result<Self, ConfigError> {
        let path = project_root.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Self::from_file(&path);
        }

        Ok(Self {
            project_root: project_root.to_path_buf(),
            ..Self::default()
        })
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Whether files with this extension can name a model. Exact match, so
    /// `sql` but not `SQL`.
    pub fn is_model_extension(&self, extension: &str) -> bool {
        self.model_extensions.iter().any(|ext| ext == extension)
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
