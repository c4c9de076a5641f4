//! Persistence of icon placement, one JSON file per physical monitor.
//!
//! The file maps [`IconKey`]s to [`IconState`]s. Saving merges into whatever is already on
//! disk, so entries of icons that are not currently live survive.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tray_shared_util::IconKey;

use crate::{IconState, Result, SavedState};

#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, screen_id: &str) -> PathBuf {
        self.dir.join(format!("systray_state_{}.json", screen_id))
    }

    /// Read the saved state for a monitor. A missing or broken file yields an empty state.
    pub fn load(&self, screen_id: &str) -> SavedState {
        let path = self.path_for(screen_id);
        log::debug!("Loading tray state from {}", path.display());
        read_raw(&path)
            .into_iter()
            .filter_map(|(key, value)| match serde_json::from_value::<IconState>(value) {
                Ok(state) => Some((IconKey(key), state)),
                Err(e) => {
                    log::debug!("Ignoring malformed state entry {:?}: {}", key, e);
                    None
                }
            })
            .collect()
    }

    /// Merge `state` into the saved state of a monitor and write it back.
    pub fn save(&self, screen_id: &str, state: &SavedState) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(screen_id);
        log::debug!("Saving tray state to {}", path.display());

        let mut merged = read_raw(&path);
        for (key, icon_state) in state.iter() {
            merged.insert(key.to_string(), serde_json::to_value(icon_state)?);
        }
        std::fs::write(&path, serde_json::to_string_pretty(&Value::Object(merged))?)?;
        Ok(path)
    }
}

/// The JSON object stored at `path`, or an empty one if there is none.
fn read_raw(path: &Path) -> Map<String, Value> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("State file not found.");
            return Map::new();
        }
        Err(e) => {
            log::debug!("Could not read state file {}: {}", path.display(), e);
            return Map::new();
        }
    };
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            log::debug!("State file is not a JSON object. Ignoring.");
            Map::new()
        }
        Err(e) => {
            log::debug!("State file decode error. Ignoring. ({})", e);
            Map::new()
        }
    }
}
