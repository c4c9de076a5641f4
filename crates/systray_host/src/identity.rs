use std::fmt;

use tray_shared_util::IconKey;
use uuid::Uuid;

use crate::{Hwnd, IconData};

/// What a tray icon is recognised by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IconIdentity {
    Guid(Uuid),
    Handle { hwnd: Hwnd, uid: u32 },
}

impl IconIdentity {
    /// The identity notifications for this icon are correlated by.
    pub fn of_notification(data: &IconData) -> Self {
        match data.guid {
            Some(guid) => IconIdentity::Guid(guid),
            None => IconIdentity::Handle { hwnd: data.hwnd, uid: data.uid },
        }
    }

    /// Keys to look up saved placement under, most specific first: the GUID key (or the path
    /// key for icons without GUID), then the path key.
    pub fn saved_state_keys(data: &IconData) -> [IconKey; 2] {
        [data.state_key(), IconKey(data.exe_path.clone())]
    }
}

impl fmt::Display for IconIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconIdentity::Guid(guid) => write!(f, "{{{}}}", guid),
            IconIdentity::Handle { hwnd, uid } => write!(f, "{:#x}:{}", hwnd.0, uid),
        }
    }
}
