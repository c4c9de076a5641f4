use serde::{Deserialize, Serialize};
use tray_shared_util::IconKey;
use uuid::Uuid;

/// Handle of the window that owns a tray icon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hwnd(pub isize);

/// The `uFlags` bitset of a tray notification. Each bit marks a group of fields as present
/// in that notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconFlags(pub u32);

impl IconFlags {
    pub const MESSAGE: IconFlags = IconFlags(0x01);
    pub const ICON: IconFlags = IconFlags(0x02);
    pub const TIP: IconFlags = IconFlags(0x04);
    pub const STATE: IconFlags = IconFlags(0x08);
    pub const INFO: IconFlags = IconFlags(0x10);
    pub const GUID: IconFlags = IconFlags(0x20);

    pub const fn empty() -> Self {
        IconFlags(0)
    }

    pub const fn contains(self, other: IconFlags) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }
}

impl std::ops::BitOr for IconFlags {
    type Output = IconFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        IconFlags(self.0 | rhs.0)
    }
}

/// `dwState` value of an icon that asks to be hidden.
pub const NIS_HIDDEN: u32 = 0x01;

/// The tray protocol message a notification was derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Add,
    #[default]
    Modify,
    Delete,
    SetFocus,
    SetVersion,
}

/// Icon pixels extracted from the platform icon handle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub pixels: Vec<u8>,
}

/// Attributes of a single tray icon, as reported by the tray monitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconData {
    pub message_type: MessageType,
    pub hwnd: Hwnd,
    pub uid: u32,
    pub flags: IconFlags,
    pub callback_message: u32,
    pub hicon: isize,
    pub tip: String,
    pub state: u32,
    pub state_mask: u32,
    pub info: String,
    pub info_title: String,
    pub info_flags: u32,
    pub timeout: u32,
    pub version: u32,
    pub guid: Option<Uuid>,
    pub icon_image: Option<IconImage>,
    pub exe: String,
    pub exe_path: String,
}

impl IconData {
    /// Overwrite this record with the fields carried by `update`.
    ///
    /// The handle, id, flags, image and executable fields are always taken. Every other field
    /// is only taken if `update.flags` marks it as present, and the version only when it is a
    /// protocol version between 1 and 4.
    pub fn apply_update(&mut self, update: &IconData) {
        self.message_type = update.message_type;
        self.hwnd = update.hwnd;
        self.uid = update.uid;
        self.flags = update.flags;
        self.icon_image = update.icon_image.clone();
        self.exe = update.exe.clone();
        self.exe_path = update.exe_path.clone();

        if (1..=4).contains(&update.version) {
            self.version = update.version;
        }

        if update.flags.contains(IconFlags::MESSAGE) {
            self.callback_message = update.callback_message;
        }
        if update.flags.contains(IconFlags::ICON) {
            self.hicon = update.hicon;
        }
        if update.flags.contains(IconFlags::TIP) {
            self.tip = update.tip.clone();
        }
        if update.flags.contains(IconFlags::STATE) {
            self.state = update.state;
            self.state_mask = update.state_mask;
        }
        if update.flags.contains(IconFlags::GUID) {
            self.guid = update.guid;
        }
        if update.flags.contains(IconFlags::INFO) {
            self.info_flags = update.info_flags;
            self.info_title = update.info_title.clone();
            self.info = update.info.clone();
            self.timeout = update.timeout;
        }
    }

    /// Whether a widget showing this notification should be hidden.
    pub fn requests_hidden(&self) -> bool {
        self.flags.contains(IconFlags::STATE) && self.state == NIS_HIDDEN
    }

    /// The key this icon's placement is persisted under: the GUID if there is one, the
    /// executable path otherwise.
    pub fn state_key(&self) -> IconKey {
        match self.guid {
            Some(guid) => IconKey(guid.to_string()),
            None => IconKey(self.exe_path.clone()),
        }
    }
}
