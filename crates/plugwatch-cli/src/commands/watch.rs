//! Watch command: run the coordinator under a periodic tick loop.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use plugwatch_core::config::CoordinatorConfig;
use plugwatch_core::protocol::JsonProtocol;
use plugwatch_core::{DiscoveryCoordinator, InMemoryRegistry};

use crate::cli::WatchArgs;
use crate::consumer::{TrackedConsumer, WatchSnapshot};
use crate::error::CliError;
use crate::output::{get_formatter, OutputFormatter};
use crate::settings::load_settings;

/// Run the watch command.
///
/// Registers a tracking consumer per requested device id, then ticks the
/// coordinator at the minimum-interval cadence until interrupted. Each tick
/// re-renders the coordinator latch and per-consumer liveness.
pub async fn run_watch(
    args: WatchArgs,
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
    if let Some(interval) = args.interval {
        settings.min_interval_secs = interval;
    }
    if args.require_consumers {
        settings.require_active_consumers = true;
    }

    let formatter = get_formatter(json);

    if !settings.aggressive {
        println!(
            "{}",
            formatter.format_message("Aggressive discovery is disabled in settings; nothing to do")
        );
        return Ok(());
    }

    let config = CoordinatorConfig::from_settings(&settings)?;
    debug!(?config, "starting watch loop");
    let tick_cadence = config.min_interval;

    let registry = Arc::new(InMemoryRegistry::new());
    let consumers: Vec<Arc<TrackedConsumer>> = args
        .ids
        .iter()
        .map(|id| {
            let consumer = TrackedConsumer::new(id.clone());
            registry.register(consumer.clone());
            consumer
        })
        .collect();

    let coordinator =
        DiscoveryCoordinator::new(config, registry, Arc::new(JsonProtocol));

    if !json {
        println!("Watching for devices (press Ctrl+C to stop)...\n");
    }

    let mut ticker = tokio::time::interval(tick_cadence);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                coordinator.on_tick();
                render(&coordinator, &consumers, formatter.as_ref(), json);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

fn render(
    coordinator: &DiscoveryCoordinator,
    consumers: &[Arc<TrackedConsumer>],
    formatter: &dyn OutputFormatter,
    json: bool,
) {
    let snapshot = WatchSnapshot {
        is_on: coordinator.is_on(),
        last_completed_at: coordinator.last_completed_at(),
        round_in_flight: coordinator.round_in_flight(),
        consumers: consumers.iter().map(|c| c.status()).collect(),
    };

    if json {
        println!("{}", formatter.format_watch(&snapshot));
    } else {
        // Clear screen between renders
        print!("\x1B[2J\x1B[1;1H");
        println!("{}", formatter.format_watch(&snapshot));
    }

    io::stdout().flush().ok();
}
