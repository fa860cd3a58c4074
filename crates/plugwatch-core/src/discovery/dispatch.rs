//! Fan-out of discovery replies to registered consumers.

use std::sync::Arc;

use tracing::trace;

use crate::record::DeviceRecord;
use crate::registry::ConsumerRegistry;

/// Routes one discovered-device record to its consumer, recursing into the
/// children of strips.
///
/// The dispatcher trusts the record tree to be acyclic (it is built from
/// owned values by the protocol codec) and performs no validation of its
/// own: malformed records are an upstream bug, not something defended
/// against here. Nothing the dispatcher does can fail the scheduling loop.
#[derive(Clone)]
pub struct UpdateDispatcher {
    registry: Arc<dyn ConsumerRegistry>,
}

impl UpdateDispatcher {
    pub fn new(registry: Arc<dyn ConsumerRegistry>) -> Self {
        Self { registry }
    }

    /// Process one top-level reply.
    ///
    /// `on_completed` fires exactly once, before any consumer work, and
    /// never for children: a single reply for a strip advances the
    /// completion latch once, then fans out to the outlet consumers.
    pub fn dispatch<F>(&self, record: &DeviceRecord, on_completed: F)
    where
        F: FnOnce(),
    {
        on_completed();
        self.fan_out(record);
    }

    fn fan_out(&self, record: &DeviceRecord) {
        match self.registry.lookup(&record.id) {
            Some(consumer) => {
                // Availability first, so the refresh sees an available device.
                consumer.mark_available();
                consumer.refresh();
            }
            None => {
                // Devices can be discovered before their consumer exists.
                trace!(id = %record.id, "no consumer registered for device");
            }
        }

        if record.is_strip {
            for child in &record.children {
                self.fan_out(child);
            }
        }
    }
}
