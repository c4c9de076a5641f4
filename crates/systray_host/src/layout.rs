use strum::Display;

use crate::{Registry, WidgetId};

/// The two groups a tray icon can be shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Group {
    /// Always visible.
    Pinned,
    /// Tucked away behind the expand toggle.
    Unpinned,
}

impl Group {
    pub fn from_pinned(is_pinned: bool) -> Self {
        if is_pinned {
            Group::Pinned
        } else {
            Group::Unpinned
        }
    }

    pub fn other(self) -> Self {
        match self {
            Group::Pinned => Group::Unpinned,
            Group::Unpinned => Group::Pinned,
        }
    }
}

/// Ordered widgets of one group.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GroupLayout {
    widgets: Vec<WidgetId>,
    style_generation: u64,
}

impl GroupLayout {
    pub fn widgets(&self) -> &[WidgetId] {
        &self.widgets
    }

    pub fn index_of(&self, id: WidgetId) -> Option<usize> {
        self.widgets.iter().position(|w| *w == id)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.widgets.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// How often this group's styles were refreshed. The renderer re-polishes on change.
    pub fn style_generation(&self) -> u64 {
        self.style_generation
    }

    pub fn refresh_styles(&mut self) {
        self.style_generation += 1;
    }

    fn remove(&mut self, id: WidgetId) -> bool {
        match self.index_of(id) {
            Some(pos) => {
                self.widgets.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Whether any widget of this group is currently visible.
    fn has_visible(&self, registry: &Registry) -> bool {
        self.widgets.iter().any(|id| registry.get(*id).is_some_and(|icon| !icon.hidden))
    }
}

/// Placement of icon widgets in the pinned and unpinned groups.
///
/// A widget is in at most one group at a time; placing it somewhere takes it out of wherever
/// it was before.
#[derive(Debug, Default)]
pub struct Layout {
    pinned: GroupLayout,
    unpinned: GroupLayout,
    drag_active: bool,
    pinned_visible: bool,
    pinned_force_shown: bool,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(&self, group: Group) -> &GroupLayout {
        match group {
            Group::Pinned => &self.pinned,
            Group::Unpinned => &self.unpinned,
        }
    }

    pub fn group_mut(&mut self, group: Group) -> &mut GroupLayout {
        match group {
            Group::Pinned => &mut self.pinned,
            Group::Unpinned => &mut self.unpinned,
        }
    }

    pub fn group_of(&self, id: WidgetId) -> Option<Group> {
        [Group::Pinned, Group::Unpinned].into_iter().find(|group| self.group(*group).contains(id))
    }

    /// Position of a widget within whichever group holds it.
    pub fn index_of(&self, id: WidgetId) -> Option<usize> {
        self.unpinned.index_of(id).or_else(|| self.pinned.index_of(id))
    }

    /// Append a widget to the end of `group`.
    pub fn push(&mut self, group: Group, id: WidgetId) {
        self.remove(id);
        self.group_mut(group).widgets.push(id);
    }

    /// Place a widget at `index` in `group`, clamped to the group's length.
    pub fn insert(&mut self, group: Group, index: usize, id: WidgetId) {
        self.remove(id);
        let widgets = &mut self.group_mut(group).widgets;
        let index = index.min(widgets.len());
        widgets.insert(index, id);
    }

    /// Replace the order of `group` with `order`, which has to hold exactly the same widgets.
    pub fn reorder(&mut self, group: Group, order: Vec<WidgetId>) {
        let widgets = &mut self.group_mut(group).widgets;
        debug_assert_eq!(widgets.len(), order.len());
        *widgets = order;
    }

    pub fn remove(&mut self, id: WidgetId) -> bool {
        // Both are attempted so a widget can never linger in the other group.
        let in_pinned = self.pinned.remove(id);
        let in_unpinned = self.unpinned.remove(id);
        in_pinned || in_unpinned
    }

    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    pub fn set_drag_active(&mut self, active: bool) {
        self.drag_active = active;
    }

    pub fn pinned_visible(&self) -> bool {
        self.pinned_visible
    }

    /// Whether the pinned group is only shown because a drag needs it as a drop target.
    pub fn pinned_force_shown(&self) -> bool {
        self.pinned_force_shown
    }

    /// Recompute whether the pinned group is shown: it is if it has a visible widget, or while
    /// a drag is in progress.
    pub fn update_pinned_visibility(&mut self, registry: &Registry) {
        let is_empty = !self.pinned.has_visible(registry);
        self.pinned_visible = !is_empty || self.drag_active;
        if self.drag_active && is_empty {
            if !self.pinned_force_shown {
                log::debug!("Force showing the empty pinned group during drag");
                self.pinned_force_shown = true;
                self.pinned.refresh_styles();
            }
        } else if self.pinned_force_shown {
            self.pinned_force_shown = false;
            self.pinned.refresh_styles();
        }
    }
}
