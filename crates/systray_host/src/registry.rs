use uuid::Uuid;

use crate::{Hwnd, IconData, WindowProbe};

/// Identifier of a live icon widget within a single host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

/// A tray icon currently shown by a host.
#[derive(Debug, Clone, PartialEq)]
pub struct IconWidget {
    pub id: WidgetId,
    pub data: IconData,
    pub is_pinned: bool,
    pub hidden: bool,
}

/// The live icon widgets of a host, in the order they appeared.
#[derive(Debug, Default)]
pub struct Registry {
    icons: Vec<IconWidget>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a widget with empty icon data.
    pub fn insert(&mut self, is_pinned: bool) -> WidgetId {
        let id = WidgetId(self.next_id);
        self.next_id += 1;
        self.icons.push(IconWidget { id, data: IconData::default(), is_pinned, hidden: false });
        id
    }

    pub fn remove(&mut self, id: WidgetId) -> Option<IconWidget> {
        let pos = self.icons.iter().position(|icon| icon.id == id)?;
        Some(self.icons.remove(pos))
    }

    pub fn get(&self, id: WidgetId) -> Option<&IconWidget> {
        self.icons.iter().find(|icon| icon.id == id)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut IconWidget> {
        self.icons.iter_mut().find(|icon| icon.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IconWidget> {
        self.icons.iter()
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Find the live icon a notification refers to.
    ///
    /// An icon with a matching GUID wins regardless of handle and id, since the GUID survives
    /// the owning window being recreated. Otherwise the exact `(hwnd, uid)` pair has to match.
    pub fn find(&self, guid: Option<Uuid>, hwnd: Hwnd, uid: u32) -> Option<WidgetId> {
        if let Some(guid) = guid {
            if let Some(icon) = self.icons.iter().find(|icon| icon.data.guid == Some(guid)) {
                return Some(icon.id);
            }
        }
        self.icons.iter().find(|icon| icon.data.hwnd == hwnd && icon.data.uid == uid).map(|icon| icon.id)
    }

    /// Drop every icon whose owning window no longer exists, returning the removed ids.
    pub fn remove_dead(&mut self, probe: &dyn WindowProbe) -> Vec<WidgetId> {
        let mut removed = Vec::new();
        self.icons.retain(|icon| {
            let alive = probe.is_window_valid(icon.data.hwnd);
            if !alive {
                log::info!("Removing tray icon of closed window {:?} ({})", icon.data.hwnd, icon.data.exe);
                removed.push(icon.id);
            }
            alive
        });
        removed
    }
}
