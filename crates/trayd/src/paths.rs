use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Stores references to all the paths relevant to trayd.
#[derive(Debug, Clone)]
pub struct TraydPaths {
    pub config_file: PathBuf,
    pub state_dir: PathBuf,
}

impl TraydPaths {
    pub fn new(config_file: Option<PathBuf>, state_dir: Option<PathBuf>) -> Result<Self> {
        let config_file = match config_file {
            Some(path) => path,
            None => default_config_dir()?.join("trayd.json"),
        };
        if config_file.is_dir() {
            bail!("Please provide the path to the config file, not the directory containing it");
        }

        let state_dir = match state_dir {
            Some(path) => path,
            None => default_state_dir()?,
        };

        Ok(TraydPaths { config_file, state_dir })
    }

    pub fn get_config_file(&self) -> &Path {
        self.config_file.as_path()
    }

    pub fn get_state_dir(&self) -> &Path {
        self.state_dir.as_path()
    }
}

impl std::fmt::Display for TraydPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "config-file: {}, state-dir: {}", self.config_file.display(), self.state_dir.display())
    }
}

fn home_dir() -> Result<PathBuf> {
    std::env::var("HOME").map(PathBuf::from).context("HOME is not set")
}

fn default_config_dir() -> Result<PathBuf> {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => home_dir()?.join(".config"),
    };
    Ok(base.join("trayd"))
}

/// Where placement state lives: the local app data folder on Windows, the XDG data dir
/// elsewhere.
fn default_state_dir() -> Result<PathBuf> {
    let base = if let Ok(dir) = std::env::var("LOCALAPPDATA") {
        PathBuf::from(dir)
    } else if let Ok(dir) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(dir)
    } else {
        home_dir()?.join(".local").join("share")
    };
    Ok(base.join("trayd"))
}
