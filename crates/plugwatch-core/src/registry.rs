//! Consumer registry seam.
//!
//! The registry maps device ids to the consumer objects that represent them
//! (UI entities, trackers, ...). It is injected into the coordinator at
//! construction; the core never owns the mapping and looks consumers up
//! fresh on every dispatch, since a device can be discovered before its
//! consumer exists.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// A consumer bound to one discovered device id.
///
/// Both operations are idempotent and side-effect-only; the dispatcher may
/// invoke them repeatedly for duplicate replies.
pub trait DeviceConsumer: Send + Sync {
    /// The device id this consumer represents.
    fn id(&self) -> &str;

    /// Mark the backing device as reachable.
    fn mark_available(&self);

    /// Ask the consumer to re-read device state. Called after
    /// `mark_available`, so a refresh always sees the device as available.
    fn refresh(&self);
}

/// Lookup surface the discovery pipeline consumes.
pub trait ConsumerRegistry: Send + Sync {
    /// Find the consumer for a device id, if one has been registered.
    fn lookup(&self, device_id: &str) -> Option<Arc<dyn DeviceConsumer>>;

    /// Whether any consumer is currently registered. Feeds the demand guard.
    fn has_any(&self) -> bool;
}

/// In-memory registry implementation used by hosts and tests.
#[derive(Default)]
pub struct InMemoryRegistry {
    consumers: RwLock<HashMap<String, Arc<dyn DeviceConsumer>>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a consumer under its own id, replacing any previous one.
    pub fn register(&self, consumer: Arc<dyn DeviceConsumer>) {
        let mut consumers = self
            .consumers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        consumers.insert(consumer.id().to_string(), consumer);
    }

    /// Remove the consumer for a device id, returning it if present.
    pub fn unregister(&self, device_id: &str) -> Option<Arc<dyn DeviceConsumer>> {
        let mut consumers = self
            .consumers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        consumers.remove(device_id)
    }
}

impl ConsumerRegistry for InMemoryRegistry {
    fn lookup(&self, device_id: &str) -> Option<Arc<dyn DeviceConsumer>> {
        let consumers = self
            .consumers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        consumers.get(device_id).cloned()
    }

    fn has_any(&self) -> bool {
        let consumers = self
            .consumers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        !consumers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopConsumer {
        id: String,
    }

    impl DeviceConsumer for NoopConsumer {
        fn id(&self) -> &str {
            &self.id
        }
        fn mark_available(&self) {}
        fn refresh(&self) {}
    }

    #[test]
    fn test_empty_registry_has_none() {
        let registry = InMemoryRegistry::new();
        assert!(!registry.has_any());
        assert!(registry.lookup("plug1").is_none());
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = InMemoryRegistry::new();
        registry.register(Arc::new(NoopConsumer {
            id: "plug1".to_string(),
        }));

        assert!(registry.has_any());
        let consumer = registry.lookup("plug1").expect("consumer registered");
        assert_eq!(consumer.id(), "plug1");
        assert!(registry.lookup("plug2").is_none());
    }

    #[test]
    fn test_unregister() {
        let registry = InMemoryRegistry::new();
        registry.register(Arc::new(NoopConsumer {
            id: "plug1".to_string(),
        }));

        assert!(registry.unregister("plug1").is_some());
        assert!(!registry.has_any());
        assert!(registry.unregister("plug1").is_none());
    }
}
