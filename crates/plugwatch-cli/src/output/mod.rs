//! Output formatting for CLI results.

pub mod json;
pub mod table;

pub use json::JsonOutput;
pub use table::TableOutput;

use plugwatch_core::DeviceRecord;

use crate::consumer::WatchSnapshot;

/// Output formatter trait
pub trait OutputFormatter {
    /// Format a list of discovered devices
    fn format_devices(&self, devices: &[DeviceRecord]) -> String;

    /// Format one watch-loop snapshot
    fn format_watch(&self, snapshot: &WatchSnapshot) -> String;

    /// Format a generic message
    fn format_message(&self, message: &str) -> String;
}

/// Get the appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TableOutput::new())
    }
}
