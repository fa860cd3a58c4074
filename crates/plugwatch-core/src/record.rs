//! Discovered-device records.

use serde::{Deserialize, Serialize};

/// One device as reported by a single discovery reply.
///
/// A record is produced fresh per reply and owned by the dispatch call that
/// processes it; nothing in the core persists it. The child tree is acyclic
/// by construction (children are owned values, so a record can never contain
/// an ancestor), which is why the dispatcher recurses without cycle
/// detection. Records with a missing id are rejected by the protocol codec
/// before they reach the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Stable device identifier, used for registry lookup.
    pub id: String,

    /// Source address of the reply. Filled in by the codec, not the device.
    #[serde(default)]
    pub ip: String,

    #[serde(default)]
    pub alias: String,

    #[serde(default)]
    pub model: String,

    /// True for multi-outlet strips that report per-outlet children.
    #[serde(default, rename = "strip")]
    pub is_strip: bool,

    /// Child devices, in the order the device reports them. Empty unless
    /// `is_strip`.
    #[serde(default)]
    pub children: Vec<DeviceRecord>,
}

impl DeviceRecord {
    /// Build a plain (non-strip) record, mostly useful in tests.
    pub fn plain(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ip: String::new(),
            alias: String::new(),
            model: String::new(),
            is_strip: false,
            children: Vec::new(),
        }
    }

    /// Build a strip record with the given children.
    pub fn strip(id: impl Into<String>, children: Vec<DeviceRecord>) -> Self {
        Self {
            id: id.into(),
            ip: String::new(),
            alias: String::new(),
            model: String::new(),
            is_strip: true,
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_record_has_no_children() {
        let record = DeviceRecord::plain("plug1");
        assert_eq!(record.id, "plug1");
        assert!(!record.is_strip);
        assert!(record.children.is_empty());
    }

    #[test]
    fn test_strip_record_keeps_child_order() {
        let record = DeviceRecord::strip(
            "strip1",
            vec![DeviceRecord::plain("strip1.0"), DeviceRecord::plain("strip1.1")],
        );
        assert!(record.is_strip);
        let ids: Vec<&str> = record.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["strip1.0", "strip1.1"]);
    }
}
