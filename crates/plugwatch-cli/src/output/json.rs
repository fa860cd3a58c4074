//! JSON output for scripting.

use plugwatch_core::DeviceRecord;

use super::OutputFormatter;
use crate::consumer::WatchSnapshot;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_devices(&self, devices: &[DeviceRecord]) -> String {
        let output = serde_json::json!({
            "devices": devices,
            "count": devices.len(),
        });
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_watch(&self, snapshot: &WatchSnapshot) -> String {
        serde_json::to_string_pretty(snapshot).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_message(&self, message: &str) -> String {
        let output = serde_json::json!({ "message": message });
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }
}
