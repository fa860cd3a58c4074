//! Discovery pipeline: rate gate, broadcast round, update dispatch, and the
//! tick-driven coordinator that wires them together.

pub mod broadcast;
pub mod coordinator;
pub mod dispatch;
pub mod gate;

pub use broadcast::BroadcastDiscoverer;
pub use coordinator::DiscoveryCoordinator;
pub use dispatch::UpdateDispatcher;
pub use gate::{should_discover, GatePolicy};
