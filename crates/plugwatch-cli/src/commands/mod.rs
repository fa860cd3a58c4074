//! Command implementations.

pub mod discover;
pub mod watch;

pub use discover::run_discover;
pub use watch::run_watch;
