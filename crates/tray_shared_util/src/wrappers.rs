use derive_more::{Debug, Display, From, FromStr};
use serde::{Deserialize, Serialize};

/// The key a tray icon's saved placement is stored under.
///
/// This is either the canonical string form of the icon's GUID, or the path of the
/// executable owning the icon.
#[repr(transparent)]
#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, From, FromStr, Display, Debug)]
#[debug("IconKey({_0})")]
#[serde(transparent)]
pub struct IconKey(pub String);

impl IconKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for IconKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IconKey {
    fn from(s: &str) -> Self {
        IconKey(s.to_owned())
    }
}
