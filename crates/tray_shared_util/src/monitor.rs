use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifying details of a physical monitor, as reported by the display server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorInfo {
    pub manufacturer: String,
    pub name: String,
    pub serial: String,
}

impl MonitorInfo {
    pub fn new(manufacturer: impl Into<String>, name: impl Into<String>, serial: impl Into<String>) -> Self {
        Self { manufacturer: manufacturer.into(), name: name.into(), serial: serial.into() }
    }

    /// A stable identifier for this monitor that is safe to use inside a file name.
    ///
    /// Manufacturer, name and serial are concatenated, uppercased, and every run of non-word
    /// characters is removed.
    pub fn normalized_id(&self) -> String {
        let raw = format!("{}{}{}", self.manufacturer, self.name, self.serial).to_uppercase();
        crate::regex!(r"\W+").replace_all(&raw, "").into_owned()
    }
}

impl fmt::Display for MonitorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.manufacturer, self.name, self.serial)
    }
}
