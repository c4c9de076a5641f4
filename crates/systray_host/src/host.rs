use std::{
    collections::HashSet,
    time::{Duration, Instant},
};

use tray_shared_util::MonitorInfo;
use uuid::Uuid;

use crate::{
    config::{LabelPosition, PinModifier, SystrayConfig},
    monitor::{MonitorClient, TrayEvent, WindowProbe},
    store::StateStore,
    Debounce, Group, Hwnd, IconData, IconIdentity, IconState, IconWidget, Layout, Registry, SavedState, WidgetId,
    UNSORTED_INDEX,
};

/// Quiet period after the last new icon before the groups are re-sorted.
pub const SORT_DEBOUNCE: Duration = Duration::from_secs(1);
/// How often to check whether the windows owning icons still exist.
pub const LIVENESS_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyModifiers {
    pub fn has(&self, modifier: PinModifier) -> bool {
        match modifier {
            PinModifier::Ctrl => self.ctrl,
            PinModifier::Alt => self.alt,
            PinModifier::Shift => self.shift,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// What the platform layer should do after a click on an icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// The click was consumed to move the icon between groups.
    PinToggled { is_pinned: bool },
    /// The click belongs to the application owning the icon.
    Forward { hwnd: Hwnd, uid: u32, callback_message: u32, version: u32, button: MouseButton },
    /// No such icon.
    Ignored,
}

/// The tray icon host of one taskbar.
///
/// Keeps the live icons of the tray in a pinned and an unpinned group, placing every new icon
/// according to the placement saved for its monitor.
#[derive(Debug)]
pub struct TrayHost {
    config: SystrayConfig,
    filtered_guids: HashSet<Uuid>,
    monitor: MonitorInfo,
    screen_id: once_cell::unsync::OnceCell<String>,
    store: StateStore,
    registry: Registry,
    layout: Layout,
    current_state: SavedState,
    sort_timer: Debounce,
    unpinned_expanded: bool,
}

impl TrayHost {
    pub fn new(config: SystrayConfig, monitor: MonitorInfo, store: StateStore) -> Self {
        Self {
            filtered_guids: config.filtered_guids(),
            unpinned_expanded: config.show_unpinned,
            config,
            monitor,
            screen_id: once_cell::unsync::OnceCell::new(),
            store,
            registry: Registry::new(),
            layout: Layout::new(),
            current_state: SavedState::new(),
            sort_timer: Debounce::new(SORT_DEBOUNCE),
        }
    }

    /// Load the saved placement, then ask the monitor to announce every existing icon.
    pub fn start(&mut self, client: &MonitorClient) {
        self.load_state();
        client.send_taskbar_created();
    }

    pub fn config(&self) -> &SystrayConfig {
        &self.config
    }

    pub fn monitor(&self) -> &MonitorInfo {
        &self.monitor
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn current_state(&self) -> &SavedState {
        &self.current_state
    }

    pub fn icon(&self, id: WidgetId) -> Option<&IconWidget> {
        self.registry.get(id)
    }

    /// The widgets of a group, in display order.
    pub fn icons_in(&self, group: Group) -> Vec<&IconWidget> {
        self.layout.group(group).widgets().iter().filter_map(|id| self.registry.get(*id)).collect()
    }

    pub fn pinned_visible(&self) -> bool {
        self.layout.pinned_visible()
    }

    /// Identifier of this host's monitor, used to name its state file.
    pub fn screen_id(&self) -> &str {
        self.screen_id.get_or_init(|| self.monitor.normalized_id())
    }

    pub fn handle_event(&mut self, event: &TrayEvent, now: Instant) {
        match event {
            TrayEvent::Modified(data) => {
                self.on_icon_modified(data, now);
            }
            TrayEvent::Deleted(data) => {
                self.on_icon_deleted(data);
            }
        }
    }

    /// Apply an add/modify notification, creating the widget if the icon is new.
    ///
    /// Returns the affected widget, or `None` if the icon is filtered.
    pub fn on_icon_modified(&mut self, data: &IconData, now: Instant) -> Option<WidgetId> {
        if data.guid.is_some_and(|guid| self.filtered_guids.contains(&guid)) {
            log::debug!("Ignoring filtered tray icon {}", IconIdentity::of_notification(data));
            return None;
        }

        let id = match self.registry.find(data.guid, data.hwnd, data.uid) {
            Some(id) => id,
            None => {
                let saved = self.current_state.lookup(data).copied().unwrap_or_default();
                let group = Group::from_pinned(saved.is_pinned);
                let id = self.registry.insert(saved.is_pinned);
                self.layout.push(group, id);
                log::debug!("New tray icon {} of {:?} placed in {} group", IconIdentity::of_notification(data), data.exe, group);
                self.sort_timer.schedule(now);
                id
            }
        };

        if let Some(icon) = self.registry.get_mut(id) {
            icon.data.apply_update(data);
            icon.hidden = data.requests_hidden();
        }
        self.layout.update_pinned_visibility(&self.registry);
        Some(id)
    }

    /// Apply a delete notification. Returns whether an icon was removed.
    pub fn on_icon_deleted(&mut self, data: &IconData) -> bool {
        let Some(id) = self.registry.find(data.guid, data.hwnd, data.uid) else {
            log::debug!("Delete for unknown tray icon {}", IconIdentity::of_notification(data));
            return false;
        };
        self.remove_icon(id);
        self.layout.update_pinned_visibility(&self.registry);
        true
    }

    /// Drop every icon whose owning window is gone. Returns how many were removed.
    pub fn check_icons(&mut self, probe: &dyn WindowProbe) -> usize {
        let removed = self.registry.remove_dead(probe);
        for id in &removed {
            self.layout.remove(*id);
        }
        if !removed.is_empty() {
            self.layout.update_pinned_visibility(&self.registry);
        }
        removed.len()
    }

    fn remove_icon(&mut self, id: WidgetId) {
        self.registry.remove(id);
        self.layout.remove(id);
    }

    /// Move an icon to the other group, and save right away.
    ///
    /// Returns whether the icon is now pinned.
    pub fn toggle_pin(&mut self, id: WidgetId) -> Option<bool> {
        let target = self.layout.group_of(id)?.other();
        self.layout.push(target, id);
        let icon = self.registry.get_mut(id)?;
        icon.is_pinned = target == Group::Pinned;
        icon.hidden = false;
        let is_pinned = icon.is_pinned;

        self.refresh_styles();
        self.save_state();
        self.layout.update_pinned_visibility(&self.registry);
        Some(is_pinned)
    }

    /// Place an icon at `index` in `group` at the end of a drag, and save right away.
    ///
    /// Visibility is left alone, since the drag is still considered in progress.
    pub fn move_icon(&mut self, id: WidgetId, group: Group, index: usize) -> bool {
        let Some(icon) = self.registry.get_mut(id) else {
            return false;
        };
        icon.is_pinned = group == Group::Pinned;
        self.layout.insert(group, index, id);

        self.refresh_styles();
        self.save_state();
        true
    }

    pub fn drag_started(&mut self) {
        self.layout.set_drag_active(true);
        self.layout.update_pinned_visibility(&self.registry);
    }

    pub fn drag_ended(&mut self) {
        self.layout.set_drag_active(false);
        self.layout.update_pinned_visibility(&self.registry);
    }

    fn refresh_styles(&mut self) {
        self.layout.group_mut(Group::Unpinned).refresh_styles();
        self.layout.group_mut(Group::Pinned).refresh_styles();
    }

    /// A click on an icon: with the pin modifier held, a left click toggles the pin. Anything
    /// else is for the application owning the icon.
    pub fn click(&mut self, id: WidgetId, button: MouseButton, modifiers: KeyModifiers) -> ClickAction {
        if button == MouseButton::Left && modifiers.has(self.config.pin_click_modifier) {
            return match self.toggle_pin(id) {
                Some(is_pinned) => ClickAction::PinToggled { is_pinned },
                None => ClickAction::Ignored,
            };
        }
        let Some(icon) = self.registry.get(id) else {
            return ClickAction::Ignored;
        };
        ClickAction::Forward {
            hwnd: icon.data.hwnd,
            uid: icon.data.uid,
            callback_message: icon.data.callback_message,
            version: icon.data.version,
            button,
        }
    }

    pub fn unpinned_expanded(&self) -> bool {
        self.unpinned_expanded
    }

    pub fn label_position(&self) -> LabelPosition {
        self.config.label_position
    }

    /// Text of the button that expands the unpinned group.
    pub fn toggle_label(&self) -> &str {
        if self.unpinned_expanded {
            &self.config.label_expanded
        } else {
            &self.config.label_collapsed
        }
    }

    /// Expand or collapse the unpinned group, returning the new button text.
    pub fn toggle_unpinned_visibility(&mut self) -> &str {
        self.unpinned_expanded = !self.unpinned_expanded;
        self.toggle_label()
    }

    /// When the pending re-sort is due, if one is pending.
    pub fn next_sort_deadline(&self) -> Option<Instant> {
        self.sort_timer.deadline()
    }

    /// Re-sort if the debounce period has passed. Returns whether a sort happened.
    pub fn poll_sort(&mut self, now: Instant) -> bool {
        if self.sort_timer.fire_if_due(now) {
            self.sort_icons();
            true
        } else {
            false
        }
    }

    /// Run a pending re-sort right away instead of waiting for the debounce period.
    /// Returns whether one was pending.
    pub fn flush_sort(&mut self) -> bool {
        if self.sort_timer.deadline().is_none() {
            return false;
        }
        self.sort_timer.cancel();
        self.sort_icons();
        true
    }

    /// The position an icon is sorted by: its saved index, or [`UNSORTED_INDEX`].
    pub fn sort_index(&self, id: WidgetId) -> i64 {
        self.registry
            .get(id)
            .and_then(|icon| self.current_state.lookup(&icon.data))
            .map_or(UNSORTED_INDEX, |state| state.index)
    }

    /// Order both groups by saved index, then snapshot the resulting positions.
    pub fn sort_icons(&mut self) {
        log::debug!("Re-sorting tray icons");
        for group in [Group::Unpinned, Group::Pinned] {
            let mut order = self.layout.group(group).widgets().to_vec();
            order.sort_by_key(|id| self.sort_index(*id));
            self.layout.reorder(group, order);
        }
        self.update_current_state();
    }

    /// Record the position and pin state of every visible icon.
    ///
    /// Entries are only ever added or overwritten, so an icon that is hidden for a while
    /// keeps its place.
    pub fn update_current_state(&mut self) {
        let snapshot: SavedState = self
            .registry
            .iter()
            .filter(|icon| !icon.hidden)
            .filter_map(|icon| {
                let key = icon.data.state_key();
                if key.as_str().is_empty() {
                    return None;
                }
                let index = self.layout.index_of(icon.id)?;
                Some((key, IconState { is_pinned: icon.is_pinned, index: index as i64 }))
            })
            .collect();
        self.current_state.merge(snapshot);
    }

    /// Snapshot the current placement and merge it into the state file of this monitor.
    pub fn save_state(&mut self) {
        self.update_current_state();
        let screen_id = self.screen_id().to_owned();
        match self.store.save(&screen_id, &self.current_state) {
            Ok(path) => log::debug!("Saved tray state to {}", path.display()),
            Err(e) => log::error!("Failed to save tray state for {}: {:?}", self.monitor, e),
        }
    }

    pub fn load_state(&mut self) {
        let screen_id = self.screen_id().to_owned();
        self.current_state = self.store.load(&screen_id);
        log::debug!("Loaded {} saved tray icon positions for {}", self.current_state.len(), screen_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::BATTERY_ICON_GUID, IconFlags, NIS_HIDDEN};
    use maplit::hashmap;
    use pretty_assertions::assert_eq;
    use tray_shared_util::IconKey;

    struct Fixture {
        host: TrayHost,
        now: Instant,
        _dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_config(SystrayConfig::default())
        }

        fn with_config(config: SystrayConfig) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let host = TrayHost::new(config, MonitorInfo::new("ACME", "DISPLAY1", "42"), StateStore::new(dir.path()));
            Self { host, now: Instant::now(), _dir: dir }
        }

        fn with_saved(entries: &[(&str, bool, i64)]) -> Self {
            let mut fixture = Self::new();
            let state: SavedState = entries
                .iter()
                .map(|(key, is_pinned, index)| (IconKey::from(*key), IconState { is_pinned: *is_pinned, index: *index }))
                .collect();
            fixture.host.store.save(fixture.host.screen_id(), &state).unwrap();
            fixture.host.load_state();
            fixture
        }

        fn modify(&mut self, data: IconData) -> Option<WidgetId> {
            self.host.on_icon_modified(&data, self.now)
        }

        fn group_paths(&self, group: Group) -> Vec<String> {
            self.host.icons_in(group).iter().map(|icon| icon.data.exe_path.clone()).collect()
        }
    }

    fn icon(hwnd: isize, uid: u32, path: &str) -> IconData {
        IconData { hwnd: Hwnd(hwnd), uid, flags: IconFlags::ICON, hicon: hwnd * 10, exe_path: path.to_string(), ..Default::default() }
    }

    struct DeadWindows(Vec<Hwnd>);

    impl WindowProbe for DeadWindows {
        fn is_window_valid(&self, hwnd: Hwnd) -> bool {
            !self.0.contains(&hwnd)
        }
    }

    #[test]
    fn test_new_icon_then_hide() {
        let mut f = Fixture::new();
        let id = f.modify(icon(100, 1, "/usr/bin/app")).unwrap();

        assert_eq!(f.host.layout().group_of(id), Some(Group::Unpinned));
        assert_eq!(f.host.sort_index(id), UNSORTED_INDEX);
        assert!(!f.host.icon(id).unwrap().hidden);

        let same = f.modify(IconData {
            hwnd: Hwnd(100),
            uid: 1,
            flags: IconFlags::STATE,
            state: NIS_HIDDEN,
            state_mask: NIS_HIDDEN,
            ..Default::default()
        });
        assert_eq!(same, Some(id));
        let widget = f.host.icon(id).unwrap();
        assert!(widget.hidden);
        assert_eq!(widget.data.hicon, 1000);
        assert_eq!(f.host.registry().len(), 1);
    }

    #[test]
    fn test_saved_pinned_icon_lands_in_pinned_group() {
        for order in [["/a", "/b"], ["/b", "/a"]] {
            let mut f = Fixture::with_saved(&[("/a", true, 0)]);
            for (i, path) in order.iter().enumerate() {
                f.modify(icon(i as isize + 1, 1, path));
            }
            assert_eq!(f.group_paths(Group::Pinned), vec!["/a"]);
            assert_eq!(f.group_paths(Group::Unpinned), vec!["/b"]);
            assert!(f.host.pinned_visible());
        }
    }

    #[test]
    fn test_filtered_icons_are_dropped() {
        let mut f = Fixture::new();
        let battery = IconData { guid: Some(BATTERY_ICON_GUID), ..icon(5, 1, "/sys/battery") };
        assert_eq!(f.modify(battery), None);
        assert!(f.host.registry().is_empty());
        assert_eq!(f.host.next_sort_deadline(), None);

        let mut f = Fixture::with_config(SystrayConfig { show_battery: true, ..Default::default() });
        let battery = IconData { guid: Some(BATTERY_ICON_GUID), ..icon(5, 1, "/sys/battery") };
        assert!(f.modify(battery).is_some());
    }

    #[test]
    fn test_guid_survives_handle_reuse() {
        let mut f = Fixture::new();
        let guid = Uuid::from_u128(77);
        let first = f.modify(IconData { guid: Some(guid), flags: IconFlags::GUID, ..icon(100, 1, "/a") }).unwrap();
        let second = f.modify(IconData { guid: Some(guid), flags: IconFlags::GUID, ..icon(200, 9, "/a") }).unwrap();
        assert_eq!(first, second);
        assert_eq!(f.host.registry().len(), 1);
        assert_eq!(f.host.icon(first).unwrap().data.hwnd, Hwnd(200));
    }

    #[test]
    fn test_delete() {
        let mut f = Fixture::with_saved(&[("/a", true, 0)]);
        f.modify(icon(1, 1, "/a"));
        f.modify(icon(2, 1, "/b"));

        assert!(!f.host.on_icon_deleted(&icon(3, 1, "/c")));
        assert!(f.host.on_icon_deleted(&icon(1, 1, "/a")));
        assert!(f.group_paths(Group::Pinned).is_empty());
        assert_eq!(f.group_paths(Group::Unpinned), vec!["/b"]);
        assert!(!f.host.pinned_visible());
        assert!(!f.host.on_icon_deleted(&icon(1, 1, "/a")));
    }

    #[test]
    fn test_liveness_sweep() {
        let mut f = Fixture::new();
        f.modify(icon(1, 1, "/a"));
        f.modify(icon(2, 1, "/b"));
        f.modify(icon(2, 2, "/b"));

        assert_eq!(f.host.check_icons(&DeadWindows(vec![])), 0);
        assert_eq!(f.host.check_icons(&DeadWindows(vec![Hwnd(2)])), 2);
        assert_eq!(f.group_paths(Group::Unpinned), vec!["/a"]);
        assert_eq!(f.host.registry().len(), 1);
    }

    #[test]
    fn test_sort_orders_by_saved_index() {
        let mut f = Fixture::with_saved(&[("/a", false, 2), ("/b", false, 0), ("/c", false, 1), ("/p2", true, 1), ("/p1", true, 0)]);
        for (i, path) in ["/new", "/a", "/b", "/p2", "/c", "/p1"].iter().enumerate() {
            f.modify(icon(i as isize + 1, 1, path));
        }
        f.host.sort_icons();
        assert_eq!(f.group_paths(Group::Unpinned), vec!["/b", "/c", "/a", "/new"]);
        assert_eq!(f.group_paths(Group::Pinned), vec!["/p1", "/p2"]);

        let new_id = f.host.registry().find(None, Hwnd(1), 1).unwrap();
        assert_eq!(f.host.sort_index(new_id), 3);

        f.host.sort_icons();
        assert_eq!(f.group_paths(Group::Unpinned), vec!["/b", "/c", "/a", "/new"]);
        assert_eq!(f.group_paths(Group::Pinned), vec!["/p1", "/p2"]);
    }

    #[test]
    fn test_sort_is_debounced() {
        let mut f = Fixture::with_saved(&[("/a", false, 1), ("/b", false, 0)]);
        f.modify(icon(1, 1, "/a"));
        f.now += Duration::from_millis(700);
        f.modify(icon(2, 1, "/b"));
        assert_eq!(f.host.next_sort_deadline(), Some(f.now + SORT_DEBOUNCE));

        assert!(!f.host.poll_sort(f.now + Duration::from_millis(500)));
        assert_eq!(f.group_paths(Group::Unpinned), vec!["/a", "/b"]);

        assert!(f.host.poll_sort(f.now + SORT_DEBOUNCE));
        assert_eq!(f.group_paths(Group::Unpinned), vec!["/b", "/a"]);
        assert!(!f.host.poll_sort(f.now + Duration::from_secs(10)));
    }

    #[test]
    fn test_flush_sort_before_deadline() {
        let mut f = Fixture::with_saved(&[("/a", false, 1), ("/b", false, 0)]);
        f.modify(icon(1, 1, "/a"));
        f.modify(icon(2, 1, "/b"));
        assert!(!f.host.poll_sort(f.now));

        assert!(f.host.flush_sort());
        assert_eq!(f.group_paths(Group::Unpinned), vec!["/b", "/a"]);
        assert_eq!(f.host.next_sort_deadline(), None);
        assert!(!f.host.flush_sort());

        f.host.save_state();
        let saved = f.host.store.load(f.host.screen_id());
        assert_eq!(saved.get("/a"), Some(&IconState { is_pinned: false, index: 1 }));
        assert_eq!(saved.get("/b"), Some(&IconState { is_pinned: false, index: 0 }));
    }

    #[test]
    fn test_snapshot_skips_hidden_but_keeps_history() {
        let mut f = Fixture::new();
        let a = f.modify(icon(1, 1, "/a")).unwrap();
        f.modify(icon(2, 1, "/b"));
        f.host.update_current_state();
        assert_eq!(f.host.current_state().get("/a"), Some(&IconState { is_pinned: false, index: 0 }));

        let b = f.host.registry().find(None, Hwnd(2), 1).unwrap();
        f.host.layout.reorder(Group::Unpinned, vec![b, a]);
        f.host.registry.get_mut(a).unwrap().hidden = true;
        f.host.update_current_state();
        assert_eq!(f.host.current_state().get("/a"), Some(&IconState { is_pinned: false, index: 0 }));
        assert_eq!(f.host.current_state().get("/b"), Some(&IconState { is_pinned: false, index: 0 }));
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let mut f = Fixture::new();
        f.modify(icon(1, 1, "/a"));
        let b = f.modify(IconData { guid: Some(Uuid::from_u128(9)), flags: IconFlags::GUID, ..icon(2, 1, "/b") }).unwrap();
        f.host.toggle_pin(b);
        let snapshot = f.host.current_state().clone();

        f.host.load_state();
        assert_eq!(f.host.current_state(), &snapshot);
        assert_eq!(
            snapshot,
            SavedState::from(hashmap! {
                IconKey::from("/a") => IconState { is_pinned: false, index: 0 },
                IconKey::from("00000000-0000-0000-0000-000000000009") => IconState { is_pinned: true, index: 0 },
            })
        );
    }

    #[test]
    fn test_save_keeps_entries_of_absent_icons() {
        let mut f = Fixture::with_saved(&[("/gone", true, 3)]);
        f.modify(icon(1, 1, "/a"));
        f.host.current_state = SavedState::new();
        f.host.save_state();
        f.host.load_state();
        assert_eq!(f.host.current_state().get("/gone"), Some(&IconState { is_pinned: true, index: 3 }));
        assert_eq!(f.host.current_state().get("/a"), Some(&IconState { is_pinned: false, index: 0 }));
    }

    #[test]
    fn test_toggle_pin_saves_immediately() {
        let mut f = Fixture::new();
        let id = f.modify(IconData { flags: IconFlags::STATE, state: NIS_HIDDEN, ..icon(1, 1, "/a") }).unwrap();
        assert!(!f.host.pinned_visible());

        assert_eq!(f.host.toggle_pin(id), Some(true));
        assert!(!f.host.icon(id).unwrap().hidden);
        assert!(f.host.pinned_visible());
        assert_eq!(f.host.layout().group(Group::Pinned).style_generation(), 1);
        assert_eq!(f.host.store.load(f.host.screen_id()).get("/a"), Some(&IconState { is_pinned: true, index: 0 }));

        assert_eq!(f.host.toggle_pin(id), Some(false));
        assert_eq!(f.group_paths(Group::Unpinned), vec!["/a"]);
        assert_eq!(f.host.store.load(f.host.screen_id()).get("/a"), Some(&IconState { is_pinned: false, index: 0 }));
    }

    #[test]
    fn test_drag_keeps_pinned_group_visible() {
        let mut f = Fixture::new();
        let id = f.modify(icon(1, 1, "/a")).unwrap();
        assert!(!f.host.pinned_visible());

        f.host.drag_started();
        assert!(f.host.pinned_visible());
        assert!(f.host.layout().pinned_force_shown());

        f.host.drag_ended();
        assert!(!f.host.pinned_visible());

        f.host.drag_started();
        assert!(f.host.move_icon(id, Group::Pinned, 0));
        assert!(f.host.icon(id).unwrap().is_pinned);
        assert!(f.host.pinned_visible());
        f.host.drag_ended();
        assert!(f.host.pinned_visible());
        assert!(!f.host.layout().pinned_force_shown());
        assert_eq!(f.host.store.load(f.host.screen_id()).get("/a"), Some(&IconState { is_pinned: true, index: 0 }));
    }

    #[test]
    fn test_move_within_group_is_persisted() {
        let mut f = Fixture::new();
        f.modify(icon(1, 1, "/a"));
        let b = f.modify(icon(2, 1, "/b")).unwrap();
        f.host.move_icon(b, Group::Unpinned, 0);
        assert_eq!(f.group_paths(Group::Unpinned), vec!["/b", "/a"]);
        let saved = f.host.store.load(f.host.screen_id());
        assert_eq!(saved.get("/b"), Some(&IconState { is_pinned: false, index: 0 }));
        assert_eq!(saved.get("/a"), Some(&IconState { is_pinned: false, index: 1 }));
    }

    #[test]
    fn test_click() {
        let mut f = Fixture::with_config(SystrayConfig { pin_click_modifier: PinModifier::Ctrl, ..Default::default() });
        let id = f.modify(IconData { callback_message: 0x8001, version: 4, flags: IconFlags::MESSAGE, ..icon(1, 3, "/a") }).unwrap();

        let alt = KeyModifiers { alt: true, ..Default::default() };
        assert_eq!(
            f.host.click(id, MouseButton::Left, alt),
            ClickAction::Forward { hwnd: Hwnd(1), uid: 3, callback_message: 0x8001, version: 4, button: MouseButton::Left }
        );

        let ctrl = KeyModifiers { ctrl: true, ..Default::default() };
        assert!(matches!(f.host.click(id, MouseButton::Right, ctrl), ClickAction::Forward { .. }));
        assert_eq!(f.host.click(id, MouseButton::Left, ctrl), ClickAction::PinToggled { is_pinned: true });
        assert_eq!(f.group_paths(Group::Pinned), vec!["/a"]);

        f.host.on_icon_deleted(&icon(1, 3, "/a"));
        assert_eq!(f.host.click(id, MouseButton::Left, ctrl), ClickAction::Ignored);
    }

    #[test]
    fn test_unpinned_toggle_labels() {
        let mut f = Fixture::with_config(SystrayConfig { show_unpinned: false, ..Default::default() });
        assert!(!f.host.unpinned_expanded());
        assert_eq!(f.host.toggle_label(), "▼");
        assert_eq!(f.host.toggle_unpinned_visibility(), "▶");
        assert!(f.host.unpinned_expanded());
        assert_eq!(f.host.toggle_unpinned_visibility(), "▼");
    }

    #[test]
    fn test_screen_id() {
        let f = Fixture::new();
        assert_eq!(f.host.screen_id(), "ACMEDISPLAY142");
    }
}
