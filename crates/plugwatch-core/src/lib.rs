//! Core library for plugwatch.
//!
//! Maintains liveness information for a fleet of smart network devices via
//! rate-gated UDP broadcast discovery rounds. Each device reply is fanned
//! out to the consumer registered for that device id, recursing into the
//! children of multi-outlet strips.

pub mod config;
pub mod discovery;
pub mod error;
pub mod protocol;
pub mod record;
pub mod registry;

pub use config::{CoordinatorConfig, DiscoverySettings};
pub use discovery::coordinator::DiscoveryCoordinator;
pub use record::DeviceRecord;
pub use registry::{ConsumerRegistry, DeviceConsumer, InMemoryRegistry};
