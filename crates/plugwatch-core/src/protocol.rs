//! Reply codec seam for the discovery protocol.
//!
//! The wire format belongs to the device vendor's library; the discoverer
//! only needs a probe datagram to broadcast and a per-datagram decoder.
//! `JsonProtocol` is the codec the CLI and tests use.

use std::net::IpAddr;

use crate::record::DeviceRecord;

/// Wire-format adapter for one discovery protocol.
pub trait DiscoveryProtocol: Send + Sync {
    /// The datagram broadcast to solicit replies.
    fn probe_payload(&self) -> Vec<u8>;

    /// Decode one reply datagram. `None` means the datagram is not a valid
    /// reply and is dropped; the round continues.
    fn parse_reply(&self, data: &[u8], source: IpAddr) -> Option<DeviceRecord>;
}

/// JSON heartbeat codec.
///
/// Replies are JSON objects with at least an `id` field; `strip` and
/// `children` describe multi-outlet devices. The source address of the
/// datagram overrides any `ip` field in the payload.
pub struct JsonProtocol;

impl DiscoveryProtocol for JsonProtocol {
    fn probe_payload(&self) -> Vec<u8> {
        br#"{"cmd":"discover"}"#.to_vec()
    }

    fn parse_reply(&self, data: &[u8], source: IpAddr) -> Option<DeviceRecord> {
        let mut record: DeviceRecord = serde_json::from_slice(data).ok()?;
        if record.id.is_empty() {
            return None;
        }
        record.ip = source.to_string();
        Some(record)
    }
}
