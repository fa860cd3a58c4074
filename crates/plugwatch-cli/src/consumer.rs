//! Tracked consumers for watch mode.
//!
//! `TrackedConsumer` is the CLI's stand-in for a host UI entity: it records
//! the availability bit and the last refresh time so the watch loop can
//! render per-device liveness.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

use plugwatch_core::registry::DeviceConsumer;

pub struct TrackedConsumer {
    id: String,
    available: AtomicBool,
    last_refreshed: Mutex<Option<DateTime<Utc>>>,
}

impl TrackedConsumer {
    pub fn new(id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            available: AtomicBool::new(false),
            last_refreshed: Mutex::new(None),
        })
    }

    pub fn status(&self) -> ConsumerStatus {
        ConsumerStatus {
            id: self.id.clone(),
            available: self.available.load(Ordering::Acquire),
            last_refreshed: *self
                .last_refreshed
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }
}

impl DeviceConsumer for TrackedConsumer {
    fn id(&self) -> &str {
        &self.id
    }

    fn mark_available(&self) {
        self.available.store(true, Ordering::Release);
    }

    fn refresh(&self) {
        let mut last = self
            .last_refreshed
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *last = Some(Utc::now());
    }
}

/// Point-in-time view of one tracked consumer.
#[derive(Debug, Clone, Serialize)]
pub struct ConsumerStatus {
    pub id: String,
    pub available: bool,
    pub last_refreshed: Option<DateTime<Utc>>,
}

/// Everything the watch loop renders on one tick.
#[derive(Debug, Clone, Serialize)]
pub struct WatchSnapshot {
    pub is_on: bool,
    pub last_completed_at: Option<DateTime<Utc>>,
    pub round_in_flight: bool,
    pub consumers: Vec<ConsumerStatus>,
}
