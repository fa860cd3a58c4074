//! Discover command implementation.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use plugwatch_core::config::CoordinatorConfig;
use plugwatch_core::discovery::BroadcastDiscoverer;
use plugwatch_core::protocol::JsonProtocol;
use plugwatch_core::DeviceRecord;

use crate::cli::DiscoverArgs;
use crate::error::CliError;
use crate::output::get_formatter;
use crate::settings::load_settings;

/// Run the discover command: one broadcast round, print what replied.
pub async fn run_discover(
    args: DiscoverArgs,
    settings_path: Option<&Path>,
    json: bool,
) -> Result<(), CliError> {
    let mut settings = load_settings(settings_path)?;
    if let Some(target) = args.target {
        settings.broadcast_target = target;
    }
    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(packets) = args.packets {
        settings.packets_per_round = packets;
    }
    if let Some(window) = args.window {
        settings.response_window_secs = window;
    }

    let config = CoordinatorConfig::from_settings(&settings)?;
    let formatter = get_formatter(json);

    if !json {
        println!(
            "Discovering devices for {} seconds...",
            settings.response_window_secs
        );
    }

    let discoverer = BroadcastDiscoverer::new(
        config.targets,
        config.packets_per_round,
        config.response_window,
        Arc::new(JsonProtocol),
    );

    let records: Mutex<Vec<DeviceRecord>> = Mutex::new(Vec::new());
    discoverer
        .discover(|record| {
            records
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(record);
        })
        .await?;

    let mut records = records.into_inner().unwrap_or_else(PoisonError::into_inner);
    records.sort_by(|a, b| a.id.cmp(&b.id));

    println!("{}", formatter.format_devices(&records));

    if records.is_empty() {
        return Err(CliError::NoDevicesFound);
    }

    Ok(())
}
