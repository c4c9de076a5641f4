use std::{collections::HashSet, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use smart_default::SmartDefault;
use strum::{Display, EnumString};
use uuid::Uuid;

/// GUID of the built-in battery tray icon.
pub const BATTERY_ICON_GUID: Uuid = Uuid::from_u128(0x7820ae75_23e3_4229_82c1_e41cb67d5b9c);
/// GUID of the built-in volume tray icon.
pub const VOLUME_ICON_GUID: Uuid = Uuid::from_u128(0x7820ae73_23e3_4229_82c1_e41cb67d5b9c);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("icon_size must be between 1 and 256, got {0}")]
    IconSize(u32),
}

/// Side of the tray the expand toggle is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    #[default]
    Left,
    Right,
}

/// Modifier key that turns a click on an icon into a pin toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum PinModifier {
    Ctrl,
    #[default]
    Alt,
    Shift,
}

#[derive(Debug, Clone, PartialEq, Eq, SmartDefault, Serialize, Deserialize)]
#[serde(default)]
pub struct SystrayConfig {
    #[default = "▼"]
    pub label_collapsed: String,
    #[default = "▶"]
    pub label_expanded: String,
    #[serde(deserialize_with = "lenient")]
    pub label_position: LabelPosition,
    #[default(16)]
    pub icon_size: u32,
    #[serde(deserialize_with = "lenient")]
    pub pin_click_modifier: PinModifier,
    #[default(true)]
    pub show_unpinned: bool,
    pub show_battery: bool,
    pub show_volume: bool,
}

impl SystrayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.icon_size == 0 || self.icon_size > 256 {
            return Err(ConfigError::IconSize(self.icon_size));
        }
        Ok(())
    }

    /// GUIDs of built-in icons that are configured to not be shown.
    pub fn filtered_guids(&self) -> HashSet<Uuid> {
        let mut guids = HashSet::new();
        if !self.show_battery {
            guids.insert(BATTERY_ICON_GUID);
        }
        if !self.show_volume {
            guids.insert(VOLUME_ICON_GUID);
        }
        guids
    }
}

/// Parse an enum option, falling back to its default on unknown values.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default + std::fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    Ok(T::from_str(raw.trim()).unwrap_or_else(|_| {
        let fallback = T::default();
        log::warn!("Unknown option value {:?}, using {}", raw, fallback);
        fallback
    }))
}
