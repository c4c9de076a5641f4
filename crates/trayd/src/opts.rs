use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Struct that gets generated from `RawOpt`.
#[derive(Debug, PartialEq, Eq)]
pub struct Opt {
    pub log_debug: bool,
    pub config_path: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
    pub action: Action,
}

#[derive(Parser, Debug, PartialEq, Eq)]
#[command(version, about)]
struct RawOpt {
    /// Write out debug logs.
    #[arg(long = "debug", global = true)]
    log_debug: bool,

    /// Override the path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the directory the icon placement is saved in
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Action {
    /// Run the tray hosts, reading tray notifications as JSON lines.
    #[command(name = "run", alias = "r")]
    Run {
        /// File to read notifications from. Reads stdin if not given.
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// Exit once all notifications were read, instead of waiting for a signal.
        #[arg(long)]
        exit_on_eof: bool,

        /// Print the pinned and unpinned icons of every monitor on exit.
        #[arg(long)]
        dump_layout: bool,
    },

    /// Print the saved icon placement of every configured monitor.
    #[command(name = "state")]
    ShowState,
}

impl Opt {
    pub fn from_env() -> Self {
        let raw: RawOpt = RawOpt::parse();
        raw.into()
    }
}

impl From<RawOpt> for Opt {
    fn from(other: RawOpt) -> Self {
        let RawOpt { log_debug, config, state_dir, action } = other;
        Opt { log_debug, config_path: config, state_dir, action }
    }
}
