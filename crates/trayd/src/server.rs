use std::{
    fmt::Write as _,
    path::Path,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use systray_host::{
    monitor::EventReceiver, store::StateStore, Group, MonitorClient, TrayHost, TrayMonitor, WindowProbe, LIVENESS_INTERVAL,
};
use tokio::sync::broadcast;

use crate::{application_lifecycle, config::TraydConfig, paths::TraydPaths, replay::ReplayMonitor};

/// Run one tray host per configured monitor until trayd is told to exit, or the notification
/// input ends when `exit_on_eof` is set.
pub fn run_hosts(paths: &TraydPaths, config: TraydConfig, events_file: Option<&Path>, exit_on_eof: bool, dump_layout: bool) -> Result<()> {
    let exit = application_lifecycle::subscribe_exit();
    simple_signal::set_handler(&[simple_signal::Signal::Int, simple_signal::Signal::Term], move |_| {
        log::info!("Shutting down trayd...");
        crate::print_result_err!("while sending the application shutdown event", application_lifecycle::send_exit());
    });

    let replay = Arc::new(ReplayMonitor::open(events_file, exit_on_eof)?);
    let client = MonitorClient::global_or_init(|| replay.clone() as Arc<dyn TrayMonitor>)
        .context("Failed to start the tray monitor")?;
    let events = client.take_events().context("The tray event channel is already in use")?;

    let mut hosts: Vec<TrayHost> = config
        .monitors
        .iter()
        .map(|monitor| TrayHost::new(config.systray.clone(), monitor.clone(), StateStore::new(paths.get_state_dir())))
        .collect();
    for host in hosts.iter_mut() {
        log::info!("Starting tray host for {} [{}]", host.monitor(), host.screen_id());
        host.start(client);
    }

    drive_hosts(&mut hosts, events, replay.as_ref(), exit, LIVENESS_INTERVAL)?;
    client.shutdown();

    if dump_layout {
        print!("{}", format_layout(&hosts));
    }
    Ok(())
}

/// Run the UI loop on the current thread, then save every host once it ends.
fn drive_hosts(
    hosts: &mut [TrayHost],
    events: EventReceiver,
    probe: &dyn WindowProbe,
    exit: broadcast::Receiver<()>,
    liveness_interval: Duration,
) -> Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to initialize tokio runtime for the UI loop")?;
    rt.block_on(run_ui_loop(hosts, events, probe, exit, liveness_interval));

    log::info!("Saving tray state");
    for host in hosts.iter_mut() {
        host.flush_sort();
        host.save_state();
    }
    Ok(())
}

/// Drain tray events into the hosts, and drive their liveness sweep and sort timers.
async fn run_ui_loop(
    hosts: &mut [TrayHost],
    mut events: EventReceiver,
    probe: &dyn WindowProbe,
    mut exit: broadcast::Receiver<()>,
    liveness_interval: Duration,
) {
    let mut liveness = tokio::time::interval(liveness_interval);
    liveness.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // the first tick completes immediately
    liveness.tick().await;

    loop {
        let next_sort = hosts.iter().filter_map(TrayHost::next_sort_deadline).min();
        let sort_at = next_sort.map_or_else(tokio::time::Instant::now, tokio::time::Instant::from_std);

        tokio::select! {
            _ = exit.recv() => {
                log::debug!("UI loop received exit event");
                break;
            }
            event = events.recv() => match event {
                Some(event) => {
                    let now = Instant::now();
                    for host in hosts.iter_mut() {
                        host.handle_event(&event, now);
                    }
                }
                None => {
                    log::info!("Tray monitor closed its event channel");
                    break;
                }
            },
            _ = liveness.tick() => {
                for host in hosts.iter_mut() {
                    host.check_icons(probe);
                }
            }
            _ = tokio::time::sleep_until(sort_at), if next_sort.is_some() => {
                let now = Instant::now();
                for host in hosts.iter_mut() {
                    host.poll_sort(now);
                }
            }
        }
    }
}

/// Human readable listing of the icons of every host.
pub fn format_layout(hosts: &[TrayHost]) -> String {
    let mut out = String::new();
    for host in hosts {
        let _ = writeln!(out, "{} [{}]", host.monitor(), host.screen_id());
        for group in [Group::Pinned, Group::Unpinned] {
            let icons: Vec<String> = host
                .icons_in(group)
                .iter()
                .map(|icon| {
                    let name = if icon.data.exe.is_empty() { icon.data.state_key().to_string() } else { icon.data.exe.clone() };
                    if icon.hidden {
                        format!("({})", name)
                    } else {
                        name
                    }
                })
                .collect();
            let _ = writeln!(out, "  {:<10}{}", format!("{}:", group), icons.join(", "));
        }
    }
    out
}

/// Human readable listing of the saved placement of every configured monitor.
pub fn format_saved_state(paths: &TraydPaths, config: &TraydConfig) -> String {
    let store = StateStore::new(paths.get_state_dir());
    let mut out = String::new();
    for monitor in &config.monitors {
        let screen_id = monitor.normalized_id();
        let _ = writeln!(out, "{} [{}]", monitor, store.path_for(&screen_id).display());
        let mut entries: Vec<_> = store.load(&screen_id).into_iter().collect();
        entries.sort_by_key(|(key, state)| (!state.is_pinned, state.index, key.clone()));
        for (key, state) in entries {
            let _ = writeln!(out, "  {} {:>4}  {}", if state.is_pinned { "pinned  " } else { "unpinned" }, state.index, key);
        }
    }
    out
}
