use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tray_shared_util::IconKey;

use crate::{IconData, IconIdentity};

/// Sort index given to icons without a saved position, placing them after every saved one.
pub const UNSORTED_INDEX: i64 = 9999;

/// The saved placement of a single icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconState {
    pub is_pinned: bool,
    /// Position within its group at the last snapshot, `-1` if never placed.
    pub index: i64,
}

impl Default for IconState {
    fn default() -> Self {
        Self { is_pinned: false, index: -1 }
    }
}

/// Placement of every icon a host has seen, keyed by [`IconKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedState(HashMap<IconKey, IconState>);

impl SavedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&IconState> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: IconKey, state: IconState) -> Option<IconState> {
        self.0.insert(key, state)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IconKey, &IconState)> {
        self.0.iter()
    }

    /// The saved placement for an icon, trying its GUID key before its executable path.
    ///
    /// If both exist the GUID entry is used, even when the two disagree.
    pub fn lookup(&self, data: &IconData) -> Option<&IconState> {
        IconIdentity::saved_state_keys(data).into_iter().find_map(|key| self.0.get(&key))
    }

    /// Overwrite entries with the ones in `other`, keeping everything `other` does not mention.
    pub fn merge(&mut self, other: SavedState) {
        self.0.extend(other.0);
    }
}

impl FromIterator<(IconKey, IconState)> for SavedState {
    fn from_iter<T: IntoIterator<Item = (IconKey, IconState)>>(iter: T) -> Self {
        SavedState(iter.into_iter().collect())
    }
}

impl IntoIterator for SavedState {
    type Item = (IconKey, IconState);
    type IntoIter = std::collections::hash_map::IntoIter<IconKey, IconState>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<HashMap<IconKey, IconState>> for SavedState {
    fn from(map: HashMap<IconKey, IconState>) -> Self {
        SavedState(map)
    }
}
