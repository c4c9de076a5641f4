use anyhow::{Context, Result};
use config::TraydConfig;
use paths::TraydPaths;

mod application_lifecycle;
mod config;
mod opts;
mod paths;
mod replay;
mod server;
mod util;

fn main() {
    let opts: opts::Opt = opts::Opt::from_env();

    let log_level_filter = if opts.log_debug { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    if std::env::var("RUST_LOG").is_ok() {
        pretty_env_logger::init_timed();
    } else {
        pretty_env_logger::formatted_timed_builder()
            .filter(Some("trayd"), log_level_filter)
            .filter(Some("systray_host"), log_level_filter)
            .init();
    }

    if let Err(err) = run(opts) {
        log::error!("{:?}", err);
        std::process::exit(1);
    }
}

fn run(opts: opts::Opt) -> Result<()> {
    let paths = TraydPaths::new(opts.config_path, opts.state_dir).context("Failed to initialize trayd paths")?;
    log::debug!("Using paths: {}", paths);
    let config = load_config(&paths);

    match opts.action {
        opts::Action::Run { events, exit_on_eof, dump_layout } => {
            log::info!("Initializing trayd with {} monitor(s)", config.monitors.len());
            server::run_hosts(&paths, config, events.as_deref(), exit_on_eof, dump_layout)
        }
        opts::Action::ShowState => {
            print!("{}", server::format_saved_state(&paths, &config));
            Ok(())
        }
    }
}

/// The config at the configured path. Falls back to the defaults if it is missing or broken.
fn load_config(paths: &TraydPaths) -> TraydConfig {
    let config_file = paths.get_config_file();
    if !config_file.exists() {
        log::info!("No config file at {}, using defaults", config_file.display());
        return TraydConfig::default();
    }
    config::read_from_file(config_file).unwrap_or_else(|err| {
        log::error!("{:?}", err);
        log::warn!("Using the default configuration");
        TraydConfig::default()
    })
}
