//! The connection to the platform's tray monitor.
//!
//! The monitor runs on its own thread, since the tray protocol blocks. It never touches host
//! state directly: every notification is sent over a bounded channel, which the UI thread
//! drains and hands to the hosts.
//!
//! Only one monitor may run per process. Two of them would echo each other's notifications,
//! so all hosts share the [`MonitorClient`] created by [`MonitorClient::global_or_init`].

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use once_cell::sync::OnceCell;
use tokio::sync::mpsc;

use crate::{Error, Hwnd, IconData, Result};

pub const EVENT_CHANNEL_CAPACITY: usize = 256;
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// A notification from the tray monitor.
#[derive(Debug, Clone, PartialEq)]
pub enum TrayEvent {
    /// An icon was added or changed.
    Modified(IconData),
    /// An icon was removed by its owner.
    Deleted(IconData),
}

/// Producer side of the tray event channel, used from the monitor thread.
#[derive(Debug, Clone)]
pub struct EventSender(mpsc::Sender<TrayEvent>);

pub type EventReceiver = mpsc::Receiver<TrayEvent>;

impl EventSender {
    /// Send an event, blocking while the channel is full.
    ///
    /// Must not be called from within an async runtime.
    pub fn send(&self, event: TrayEvent) -> Result<()> {
        self.0.blocking_send(event).map_err(|_| Error::ChannelClosed)
    }

    pub fn icon_modified(&self, data: IconData) -> Result<()> {
        self.send(TrayEvent::Modified(data))
    }

    pub fn icon_deleted(&self, data: IconData) -> Result<()> {
        self.send(TrayEvent::Deleted(data))
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}

pub fn event_channel() -> (EventSender, EventReceiver) {
    let (send, recv) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    (EventSender(send), recv)
}

/// A source of tray icon notifications.
pub trait TrayMonitor: Send + Sync + 'static {
    /// Run the protocol loop, forwarding notifications until stopped or the channel closes.
    /// This is called on the dedicated monitor thread and may block.
    fn run(&self, events: EventSender) -> Result<()>;

    /// Ask the platform to announce all existing icons again.
    fn send_taskbar_created(&self);

    /// Make `run` return as soon as possible.
    fn shutdown(&self) {}
}

/// Check for whether the window owning an icon still exists.
pub trait WindowProbe {
    fn is_window_valid(&self, hwnd: Hwnd) -> bool;
}

/// Handle to a running tray monitor and its thread.
pub struct MonitorClient {
    monitor: Arc<dyn TrayMonitor>,
    events: Mutex<Option<EventReceiver>>,
    thread_handle: Mutex<Option<std::thread::JoinHandle<()>>>,
}

static CLIENT: OnceCell<MonitorClient> = OnceCell::new();

impl MonitorClient {
    /// Start `monitor` on a new thread.
    pub fn spawn(monitor: Arc<dyn TrayMonitor>) -> Result<Self> {
        let (send, recv) = event_channel();
        let thread_handle = std::thread::Builder::new()
            .name("tray-monitor".to_string())
            .spawn({
                let monitor = monitor.clone();
                move || {
                    log::debug!("Tray monitor thread started");
                    if let Err(e) = monitor.run(send) {
                        log::error!("Tray monitor stopped with error: {:?}", e);
                    }
                    log::debug!("Tray monitor thread finished");
                }
            })
            .map_err(Error::MonitorThread)?;

        Ok(Self { monitor, events: Mutex::new(Some(recv)), thread_handle: Mutex::new(Some(thread_handle)) })
    }

    /// The process-wide client, started with the monitor from `make_monitor` on first call.
    /// Later calls return the same client and do not call `make_monitor`.
    pub fn global_or_init(make_monitor: impl FnOnce() -> Arc<dyn TrayMonitor>) -> Result<&'static MonitorClient> {
        CLIENT.get_or_try_init(|| MonitorClient::spawn(make_monitor()))
    }

    /// The process-wide client, if it was started.
    pub fn global() -> Option<&'static MonitorClient> {
        CLIENT.get()
    }

    /// Take the receiving end of the event channel. Only the first caller gets it.
    pub fn take_events(&self) -> Option<EventReceiver> {
        self.events.lock().unwrap().take() // unwrap: mutex poisoning is okay
    }

    pub fn send_taskbar_created(&self) {
        self.monitor.send_taskbar_created();
    }

    /// Stop the monitor and wait for its thread to finish. Later calls do nothing.
    ///
    /// A monitor stuck in blocking I/O is given [`SHUTDOWN_GRACE`] to notice, after which its
    /// thread is left to die with the process.
    pub fn shutdown(&self) {
        self.monitor.shutdown();
        let handle = self.thread_handle.lock().unwrap().take(); // unwrap: mutex poisoning is okay
        let Some(handle) = handle else {
            return;
        };
        let deadline = Instant::now() + SHUTDOWN_GRACE;
        while !handle.is_finished() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        if !handle.is_finished() {
            log::debug!("Tray monitor thread did not stop in time, detaching it");
        } else if handle.join().is_err() {
            log::error!("Tray monitor thread panicked");
        }
    }
}

impl std::fmt::Debug for MonitorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorClient").finish_non_exhaustive()
    }
}
