//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// plugwatch - broadcast discovery and liveness watcher for smart devices
#[derive(Parser, Debug)]
#[command(name = "plugwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the settings file (defaults to the platform config dir)
    #[arg(long, global = true, env = "PLUGWATCH_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single discovery round and print the devices that replied
    Discover(DiscoverArgs),

    /// Continuously run gated discovery rounds and track device liveness
    Watch(WatchArgs),
}

// ==================== Discover ====================

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Discovery target: unicast or broadcast address, comma-separated list allowed
    #[arg(short, long)]
    pub target: Option<String>,

    /// UDP discovery port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Probe datagrams sent per round, per target
    #[arg(long)]
    pub packets: Option<u32>,

    /// Seconds to wait for replies after the probes are sent
    #[arg(short, long)]
    pub window: Option<u64>,
}

// ==================== Watch ====================

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Device ids to track (consumers are registered for these)
    #[arg(short, long, value_delimiter = ',')]
    pub ids: Vec<String>,

    /// Discovery target: unicast or broadcast address, comma-separated list allowed
    #[arg(short, long)]
    pub target: Option<String>,

    /// UDP discovery port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Probe datagrams sent per round, per target
    #[arg(long)]
    pub packets: Option<u32>,

    /// Seconds to wait for replies after the probes are sent
    #[arg(short, long)]
    pub window: Option<u64>,

    /// Minimum seconds between discovery rounds (also the tick cadence)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Skip rounds while no device id is being tracked
    #[arg(long)]
    pub require_consumers: bool,
}
