//! Tick-driven discovery coordinator.
//!
//! Owns the rate gate, the broadcaster, and the dispatcher, plus the
//! one-way availability latch: until any reply is observed the coordinator
//! reports off/unavailable, and after the first reply it never reverts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::CoordinatorConfig;
use crate::discovery::broadcast::BroadcastDiscoverer;
use crate::discovery::dispatch::UpdateDispatcher;
use crate::discovery::gate::{should_discover, GatePolicy};
use crate::protocol::DiscoveryProtocol;
use crate::record::DeviceRecord;
use crate::registry::ConsumerRegistry;

/// Completion latch. `last_completed` drives the gate; `last_completed_at`
/// is the wall-clock twin exposed to hosts. Both are written together and
/// never cleared.
#[derive(Default)]
struct LatchState {
    last_completed: Option<Instant>,
    last_completed_at: Option<DateTime<Utc>>,
}

fn latch_guard(latch: &Mutex<LatchState>) -> MutexGuard<'_, LatchState> {
    latch.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Advance the latch to now. Monotone: a reply racing another reply can
/// never move the latch backwards, and nothing ever clears it.
fn advance_latch(latch: &Mutex<LatchState>) {
    let now = Instant::now();
    let mut state = latch_guard(latch);

    if state.last_completed.map_or(true, |prev| now >= prev) {
        state.last_completed = Some(now);
        state.last_completed_at = Some(Utc::now());
    }
}

/// Drives rate-gated discovery rounds from an external tick source.
///
/// Configuration is immutable for the coordinator's lifetime; to
/// reconfigure, drop it and construct a new one. All latch writes go
/// through one mutex, so replies arriving on the round's task cannot race
/// ticks on the scheduler's task.
pub struct DiscoveryCoordinator {
    policy: GatePolicy,
    registry: Arc<dyn ConsumerRegistry>,
    discoverer: BroadcastDiscoverer,
    dispatcher: UpdateDispatcher,
    latch: Arc<Mutex<LatchState>>,
    round_in_flight: Arc<AtomicBool>,
}

impl DiscoveryCoordinator {
    pub fn new(
        config: CoordinatorConfig,
        registry: Arc<dyn ConsumerRegistry>,
        protocol: Arc<dyn DiscoveryProtocol>,
    ) -> Self {
        let discoverer = BroadcastDiscoverer::new(
            config.targets,
            config.packets_per_round,
            config.response_window,
            protocol,
        );

        Self {
            policy: GatePolicy {
                min_interval: config.min_interval,
                require_active_consumers: config.require_active_consumers,
            },
            dispatcher: UpdateDispatcher::new(Arc::clone(&registry)),
            registry,
            discoverer,
            latch: Arc::new(Mutex::new(LatchState::default())),
            round_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Scheduler entry point. Consults the gate and, if a round is
    /// permitted and none is already in flight, spawns one. Returns
    /// immediately; replies are handled on the round's own task.
    pub fn on_tick(&self) {
        let now = Instant::now();
        let last_completed = latch_guard(&self.latch).last_completed;

        if !should_discover(now, last_completed, &self.policy, self.registry.has_any()) {
            return;
        }

        // Overlapping rounds are skipped rather than queued: a round still
        // collecting replies satisfies whatever this tick would have asked.
        if self.round_in_flight.swap(true, Ordering::AcqRel) {
            debug!("discovery round already in flight, skipping tick");
            return;
        }

        let discoverer = self.discoverer.clone();
        let dispatcher = self.dispatcher.clone();
        let latch = Arc::clone(&self.latch);
        let in_flight = Arc::clone(&self.round_in_flight);

        tokio::spawn(async move {
            let on_device = |record: DeviceRecord| {
                dispatcher.dispatch(&record, || advance_latch(&latch));
            };

            if let Err(e) = discoverer.discover(on_device).await {
                // Recoverable: the round produced nothing, the next tick
                // retries.
                warn!("discovery round failed: {}", e);
            }

            in_flight.store(false, Ordering::Release);
        });
    }

    /// True once any discovery reply has ever been observed.
    pub fn is_on(&self) -> bool {
        latch_guard(&self.latch).last_completed.is_some()
    }

    /// Availability mirrors `is_on`: the latch is one-way.
    pub fn is_available(&self) -> bool {
        self.is_on()
    }

    /// Wall-clock time of the most recent observed reply.
    pub fn last_completed_at(&self) -> Option<DateTime<Utc>> {
        latch_guard(&self.latch).last_completed_at
    }

    /// Whether a broadcast round is currently collecting replies.
    pub fn round_in_flight(&self) -> bool {
        self.round_in_flight.load(Ordering::Acquire)
    }

    #[cfg(test)]
    fn mark_round_completed(&self) {
        advance_latch(&self.latch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiscoverySettings;
    use crate::protocol::JsonProtocol;
    use crate::registry::{DeviceConsumer, InMemoryRegistry};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::net::UdpSocket;

    struct CountingConsumer {
        id: String,
        available: AtomicBool,
        refreshes: AtomicUsize,
    }

    impl CountingConsumer {
        fn new(id: &str) -> Arc<Self> {
            Arc::new(Self {
                id: id.to_string(),
                available: AtomicBool::new(false),
                refreshes: AtomicUsize::new(0),
            })
        }
    }

    impl DeviceConsumer for CountingConsumer {
        fn id(&self) -> &str {
            &self.id
        }
        fn mark_available(&self) {
            self.available.store(true, Ordering::SeqCst);
        }
        fn refresh(&self) {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn coordinator_for(
        target: std::net::SocketAddr,
        registry: Arc<InMemoryRegistry>,
        min_interval_secs: u64,
        response_window_ms: u64,
    ) -> DiscoveryCoordinator {
        let settings = DiscoverySettings {
            broadcast_target: target.ip().to_string(),
            port: target.port(),
            min_interval_secs,
            packets_per_round: 1,
            ..Default::default()
        };
        let mut config = CoordinatorConfig::from_settings(&settings).unwrap();
        config.response_window = Duration::from_millis(response_window_ms);
        DiscoveryCoordinator::new(config, registry, Arc::new(JsonProtocol))
    }

    #[test]
    fn test_initial_state_is_off() {
        let registry = Arc::new(InMemoryRegistry::new());
        let config = CoordinatorConfig::from_settings(&DiscoverySettings::default()).unwrap();
        let coordinator = DiscoveryCoordinator::new(config, registry, Arc::new(JsonProtocol));

        assert!(!coordinator.is_on());
        assert!(!coordinator.is_available());
        assert!(coordinator.last_completed_at().is_none());
        assert!(!coordinator.round_in_flight());
    }

    #[test]
    fn test_latch_is_one_way_and_monotone() {
        let registry = Arc::new(InMemoryRegistry::new());
        let config = CoordinatorConfig::from_settings(&DiscoverySettings::default()).unwrap();
        let coordinator = DiscoveryCoordinator::new(config, registry, Arc::new(JsonProtocol));

        coordinator.mark_round_completed();
        let first = coordinator.last_completed_at().unwrap();
        assert!(coordinator.is_on());

        coordinator.mark_round_completed();
        let second = coordinator.last_completed_at().unwrap();
        assert!(second >= first);
        assert!(coordinator.is_on());
    }

    #[tokio::test]
    async fn test_tick_reply_dispatch_end_to_end() {
        // Loopback device answering probes for a strip with one registered
        // outlet.
        let device = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = device.local_addr().unwrap();
        tokio::spawn(async move {
            let mut buf = [0u8; 512];
            if let Ok((_, peer)) = device.recv_from(&mut buf).await {
                let reply = r#"{
                    "id": "strip1",
                    "strip": true,
                    "children": [{"id": "strip1.0"}, {"id": "strip1.1"}]
                }"#;
                let _ = device.send_to(reply.as_bytes(), peer).await;
            }
        });

        let registry = Arc::new(InMemoryRegistry::new());
        let outlet = CountingConsumer::new("strip1.0");
        registry.register(outlet.clone());

        let coordinator = coordinator_for(target, registry, 10, 400);

        coordinator.on_tick();
        tokio::time::sleep(Duration::from_millis(700)).await;

        // Latch advanced even though "strip1" itself has no consumer.
        assert!(coordinator.is_on());
        assert!(coordinator.is_available());
        assert!(coordinator.last_completed_at().is_some());

        assert!(outlet.available.load(Ordering::SeqCst));
        assert_eq!(outlet.refreshes.load(Ordering::SeqCst), 1);

        // Round finished; the gate now blocks until min_interval elapses.
        assert!(!coordinator.round_in_flight());
        coordinator.on_tick();
        assert!(!coordinator.round_in_flight());
    }

    #[tokio::test]
    async fn test_in_flight_round_blocks_next_tick() {
        // Silent target: the round runs for its full window.
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = silent.local_addr().unwrap();

        let registry = Arc::new(InMemoryRegistry::new());
        let coordinator = coordinator_for(target, registry, 0, 600);

        coordinator.on_tick();
        assert!(coordinator.round_in_flight());

        // min_interval is zero and the latch is unset, so only the
        // in-flight flag stops this tick from spawning a second round.
        coordinator.on_tick();
        assert!(coordinator.round_in_flight());

        tokio::time::sleep(Duration::from_millis(900)).await;
        assert!(!coordinator.round_in_flight());
        assert!(!coordinator.is_on());
    }

    #[tokio::test]
    async fn test_demand_guard_skips_round_without_consumers() {
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = silent.local_addr().unwrap();

        let registry = Arc::new(InMemoryRegistry::new());
        let settings = DiscoverySettings {
            broadcast_target: target.ip().to_string(),
            port: target.port(),
            require_active_consumers: true,
            ..Default::default()
        };
        let config = CoordinatorConfig::from_settings(&settings).unwrap();
        let coordinator = DiscoveryCoordinator::new(
            config,
            registry.clone(),
            Arc::new(JsonProtocol),
        );

        coordinator.on_tick();
        assert!(!coordinator.round_in_flight());

        registry.register(CountingConsumer::new("plug1"));
        coordinator.on_tick();
        assert!(coordinator.round_in_flight());
    }
}
