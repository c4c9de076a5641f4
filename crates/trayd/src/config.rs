use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use systray_host::config::SystrayConfig;
use tray_shared_util::MonitorInfo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraydConfig {
    pub systray: SystrayConfig,
    /// One tray host is run per monitor.
    pub monitors: Vec<MonitorInfo>,
}

impl Default for TraydConfig {
    fn default() -> Self {
        Self { systray: SystrayConfig::default(), monitors: vec![MonitorInfo::new("", "default", "")] }
    }
}

pub fn read_from_file(path: &Path) -> Result<TraydConfig> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

fn parse(content: &str) -> Result<TraydConfig> {
    let mut config: TraydConfig = serde_json::from_str(content)?;
    config.systray.validate()?;
    if config.monitors.is_empty() {
        log::warn!("No monitors configured, using a single default monitor");
        config.monitors = TraydConfig::default().monitors;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use systray_host::config::PinModifier;

    #[test]
    fn test_parse_full() {
        let config = parse(
            r#"{
                "systray": { "icon_size": 20, "pin_click_modifier": "shift", "show_volume": true },
                "monitors": [{ "manufacturer": "DEL", "name": "DISPLAY1", "serial": "1234" }]
            }"#,
        )
        .unwrap();
        assert_eq!(config.systray.icon_size, 20);
        assert_eq!(config.systray.pin_click_modifier, PinModifier::Shift);
        assert!(config.systray.show_volume);
        assert_eq!(config.monitors, vec![MonitorInfo::new("DEL", "DISPLAY1", "1234")]);
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        assert_eq!(parse("{}").unwrap(), TraydConfig::default());
        assert_eq!(parse(r#"{"monitors": []}"#).unwrap(), TraydConfig::default());
    }

    #[test]
    fn test_invalid_icon_size_is_rejected() {
        assert!(parse(r#"{"systray": {"icon_size": 0}}"#).is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_from_file(&dir.path().join("trayd.json")).is_err());
    }
}
