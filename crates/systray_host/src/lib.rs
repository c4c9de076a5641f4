pub mod config;
pub mod error;
pub mod monitor;
pub mod store;

mod debounce;
pub use debounce::*;

mod host;
pub use host::*;

mod icon;
pub use icon::*;

mod identity;
pub use identity::*;

mod layout;
pub use layout::*;

mod registry;
pub use registry::*;

mod state;
pub use state::*;

pub use error::{Error, Result};
pub use monitor::{MonitorClient, TrayEvent, TrayMonitor, WindowProbe};
