//! Project discovery and configuration

use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Name of the optional project configuration file
pub const CONFIG_FILE: &str = "treecount.toml";

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Failed to read treecount.toml: {0}")]
    ConfigReadError(#[from] std::io::Error),

    #[error("Failed to parse treecount.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("Data directory {0:?} does not exist")]
    DataDirNotFound(PathBuf),
}

#[derive(Debug, Deserialize, Default)]
struct ProjectConfig {
    data: Option<DataConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct DataConfig {
    root: Option<String>,
    extension: Option<String>,
    limit: Option<usize>,
    normalize: Option<bool>,
}

/// Where tree dumps live and how to load them
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub extension: String,
    pub limit: Option<usize>,
    pub normalize: bool,
}

impl Project {
    /// Discover a project by searching for `treecount.toml` from the current
    /// directory upwards; without one, defaults are rooted at the current
    /// directory.
    pub fn discover() -> Result<Self, ProjectError> {
        let current_dir = std::env::current_dir()?;
        match Self::find_project_root(&current_dir) {
            Some(root) => Self::load(&root),
            None => Self::from_config_str(&current_dir, ""),
        }
    }

    /// Load the configuration found in `root`
    pub fn load(root: &Path) -> Result<Self, ProjectError> {
        let config_content = fs::read_to_string(root.join(CONFIG_FILE))?;
        Self::from_config_str(root, &config_content)
    }

    pub fn from_config_str(root: &Path, config_content: &str) -> Result<Self, ProjectError> {
        let config: ProjectConfig = toml::from_str(config_content)?;

        // Extract configuration with defaults
        let data = config.data.unwrap_or_default();

        Ok(Self {
            root: root.to_path_buf(),
            data_dir: root.join(data.root.unwrap_or_else(|| "data".to_string())),
            extension: data.extension.unwrap_or_else(|| "txt".to_string()),
            limit: data.limit,
            normalize: data.normalize.unwrap_or(false),
        })
    }

    fn find_project_root(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(CONFIG_FILE).exists() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// All dump files under the data directory, in sorted path order and
    /// capped at `limit`
    pub fn find_dumps(&self) -> Result<Vec<PathBuf>, ProjectError> {
        if !self.data_dir.is_dir() {
            return Err(ProjectError::DataDirNotFound(self.data_dir.clone()));
        }

        let mut dumps: Vec<PathBuf> = WalkDir::new(&self.data_dir)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext == self.extension.as_str())
            })
            .map(|entry| entry.path().to_path_buf())
            .collect();

        dumps.sort();
        if let Some(limit) = self.limit {
            dumps.truncate(limit);
        }

        Ok(dumps)
    }
}
