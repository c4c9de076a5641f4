use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    #[error("Failed to (de)serialize icon state")]
    Json(#[from] serde_json::Error),
    #[error("The tray event channel was closed")]
    ChannelClosed,
    #[error("Failed to start the tray monitor thread")]
    MonitorThread(#[source] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
