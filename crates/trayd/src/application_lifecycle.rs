//! Global application exit handling: `send_exit()` notifies every task holding a receiver
//! from `subscribe_exit()` that trayd is shutting down.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use tokio::sync::broadcast;

pub static APPLICATION_EXIT_SENDER: Lazy<broadcast::Sender<()>> = Lazy::new(|| broadcast::channel(2).0);

/// Notify all listening tasks of the termination of the trayd process.
pub fn send_exit() -> Result<()> {
    (APPLICATION_EXIT_SENDER).send(()).context("Failed to send exit lifecycle event")?;
    Ok(())
}

/// Subscribe to the exit event. Subscribe before waiting in a loop, so an exit sent in between
/// two iterations is not lost.
pub fn subscribe_exit() -> broadcast::Receiver<()> {
    APPLICATION_EXIT_SENDER.subscribe()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_reaches_early_subscriber() {
        let mut exit = subscribe_exit();
        send_exit().unwrap();
        assert!(exit.try_recv().is_ok());
    }
}
