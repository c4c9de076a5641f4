//! A tray monitor that replays notifications from newline-delimited JSON.
//!
//! Each line is one object tagged by `event`:
//!
//! ```text
//! {"event": "modify", "hwnd": 100, "uid": 1, "flags": 2, "hicon": 7, "exe_path": "/usr/bin/nm-applet"}
//! {"event": "delete", "hwnd": 100, "uid": 1}
//! {"event": "window_destroyed", "hwnd": 100}
//! {"event": "sleep", "ms": 500}
//! ```

use std::{
    collections::{HashMap, HashSet},
    io::BufRead,
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;
use systray_host::{monitor::EventSender, Hwnd, IconData, TrayMonitor, WindowProbe};

const IDLE_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReplayLine {
    Modify(IconData),
    Delete(IconData),
    WindowDestroyed { hwnd: Hwnd },
    Sleep { ms: u64 },
}

/// Parse one input line. Blank and malformed lines yield `None`.
pub fn parse_line(line: &str) -> Option<ReplayLine> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(entry) => Some(entry),
        Err(e) => {
            log::warn!("Skipping malformed tray notification {:?}: {}", line, e);
            None
        }
    }
}

pub struct ReplayMonitor {
    source: Mutex<Option<Box<dyn BufRead + Send>>>,
    exit_on_eof: bool,
    live: Mutex<HashMap<(Hwnd, u32), IconData>>,
    destroyed: Mutex<HashSet<Hwnd>>,
    resend_requested: AtomicBool,
    stop: AtomicBool,
}

impl ReplayMonitor {
    pub fn new(source: Box<dyn BufRead + Send>, exit_on_eof: bool) -> Self {
        Self {
            source: Mutex::new(Some(source)),
            exit_on_eof,
            live: Mutex::new(HashMap::new()),
            destroyed: Mutex::new(HashSet::new()),
            resend_requested: AtomicBool::new(false),
            stop: AtomicBool::new(false),
        }
    }

    /// Replay the file at `path`, or stdin if there is none.
    pub fn open(path: Option<&Path>, exit_on_eof: bool) -> anyhow::Result<Self> {
        let source: Box<dyn BufRead + Send> = match path {
            Some(path) => {
                let file = std::fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
                Box::new(std::io::BufReader::new(file))
            }
            None => Box::new(std::io::BufReader::new(std::io::stdin())),
        };
        Ok(Self::new(source, exit_on_eof))
    }

    fn apply(&self, entry: ReplayLine, events: &EventSender) -> systray_host::Result<()> {
        match entry {
            ReplayLine::Modify(data) => {
                self.remember(&data);
                events.icon_modified(data)
            }
            ReplayLine::Delete(data) => {
                self.live.lock().unwrap().remove(&(data.hwnd, data.uid)); // unwrap: mutex poisoning is okay
                events.icon_deleted(data)
            }
            ReplayLine::WindowDestroyed { hwnd } => {
                log::debug!("Window {:?} destroyed", hwnd);
                self.live.lock().unwrap().retain(|(live_hwnd, _), _| *live_hwnd != hwnd); // unwrap: mutex poisoning is okay
                self.destroyed.lock().unwrap().insert(hwnd); // unwrap: mutex poisoning is okay
                Ok(())
            }
            ReplayLine::Sleep { ms } => {
                std::thread::sleep(Duration::from_millis(ms));
                Ok(())
            }
        }
    }

    /// Fold a notification into the full record of its icon, so a resend carries every field
    /// seen so far.
    fn remember(&self, data: &IconData) {
        let mut live = self.live.lock().unwrap(); // unwrap: mutex poisoning is okay
        let record = live.entry((data.hwnd, data.uid)).or_default();
        let seen = record.flags | data.flags;
        record.apply_update(data);
        record.flags = seen;
    }

    fn resend_if_requested(&self, events: &EventSender) -> systray_host::Result<()> {
        if !self.resend_requested.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        let live: Vec<IconData> = self.live.lock().unwrap().values().cloned().collect(); // unwrap: mutex poisoning is okay
        log::debug!("Announcing {} live tray icons again", live.len());
        for data in live {
            events.icon_modified(data)?;
        }
        Ok(())
    }
}

impl TrayMonitor for ReplayMonitor {
    fn run(&self, events: EventSender) -> systray_host::Result<()> {
        let source = self.source.lock().unwrap().take(); // unwrap: mutex poisoning is okay
        let Some(source) = source else {
            log::warn!("Tray notification input was already consumed");
            return Ok(());
        };

        for line in source.lines() {
            if self.stop.load(Ordering::SeqCst) {
                return Ok(());
            }
            self.resend_if_requested(&events)?;
            if let Some(entry) = parse_line(&line?) {
                self.apply(entry, &events)?;
            }
        }
        log::debug!("Reached the end of the tray notification input");

        if self.exit_on_eof {
            return self.resend_if_requested(&events);
        }
        while !self.stop.load(Ordering::SeqCst) {
            self.resend_if_requested(&events)?;
            std::thread::sleep(IDLE_POLL);
        }
        Ok(())
    }

    fn send_taskbar_created(&self) {
        self.resend_requested.store(true, Ordering::SeqCst);
    }

    fn shutdown(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

impl WindowProbe for ReplayMonitor {
    fn is_window_valid(&self, hwnd: Hwnd) -> bool {
        !self.destroyed.lock().unwrap().contains(&hwnd) // unwrap: mutex poisoning is okay
    }
}
