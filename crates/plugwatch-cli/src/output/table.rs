//! Human-readable table output.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use plugwatch_core::DeviceRecord;

use super::OutputFormatter;
use crate::consumer::WatchSnapshot;

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

fn push_device_rows(table: &mut Table, record: &DeviceRecord, indent: &str) {
    let kind = if record.is_strip { "strip" } else { "plug" };
    table.add_row(vec![
        format!("{}{}", indent, record.id),
        record.ip.clone(),
        record.alias.clone(),
        record.model.clone(),
        kind.to_string(),
    ]);

    for child in &record.children {
        push_device_rows(table, child, &format!("{}  ", indent));
    }
}

impl OutputFormatter for TableOutput {
    fn format_devices(&self, devices: &[DeviceRecord]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["ID", "IP", "Alias", "Model", "Type"]);

        for device in devices {
            push_device_rows(&mut table, device, "");
        }

        format!("{}\nFound {} device(s)", table, devices.len())
    }

    fn format_watch(&self, snapshot: &WatchSnapshot) -> String {
        let state = if snapshot.is_on {
            "ON".green().bold().to_string()
        } else {
            "OFF".yellow().bold().to_string()
        };
        let last = snapshot
            .last_completed_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "never".to_string());

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Device", "Available", "Last refresh"]);
        for consumer in &snapshot.consumers {
            table.add_row(vec![
                consumer.id.clone(),
                if consumer.available { "yes" } else { "no" }.to_string(),
                consumer
                    .last_refreshed
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string()),
            ]);
        }

        let round = if snapshot.round_in_flight {
            " (round in flight)"
        } else {
            ""
        };

        format!("Updater: {}  Last reply: {}{}\n{}", state, last, round, table)
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_devices_table_lists_children_indented() {
        let record = DeviceRecord::strip(
            "strip1",
            vec![DeviceRecord::plain("strip1.0"), DeviceRecord::plain("strip1.1")],
        );

        let output = TableOutput::new().format_devices(&[record]);
        assert!(output.contains("strip1"));
        assert!(output.contains("  strip1.0"));
        assert!(output.contains("Found 1 device(s)"));
    }

    #[test]
    fn test_watch_shows_never_before_first_reply() {
        let snapshot = WatchSnapshot {
            is_on: false,
            last_completed_at: None,
            round_in_flight: false,
            consumers: Vec::new(),
        };

        let output = TableOutput::new().format_watch(&snapshot);
        assert!(output.contains("never"));
    }
}
