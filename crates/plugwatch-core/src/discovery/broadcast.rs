//! One-shot UDP broadcast discovery rounds.
//!
//! Uses SO_REUSEADDR/SO_REUSEPORT so a round can coexist with other
//! listeners on the host. The discoverer is oblivious to consumers: it only
//! sends probes and decodes replies.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;
use std::time::{Duration, Instant};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::DiscoveryError;
use crate::protocol::DiscoveryProtocol;
use crate::record::DeviceRecord;

/// Upper bound on a single receive wait, so the window deadline is checked
/// regularly even when no packets arrive.
const RECEIVE_TIMEOUT: Duration = Duration::from_millis(500);

/// Reply datagram buffer size
const RECV_BUFFER_SIZE: usize = 2048;

/// Create a broadcast-capable UDP socket bound to an ephemeral port.
fn create_broadcast_socket() -> Result<std::net::UdpSocket, std::io::Error> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

    socket.set_reuse_address(true)?;

    #[cfg(unix)]
    socket.set_reuse_port(true)?;

    socket.set_broadcast(true)?;

    let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0));
    socket.bind(&addr.into())?;

    socket.set_nonblocking(true)?;

    Ok(socket.into())
}

/// Issues one broadcast discovery round at a time.
///
/// A round sends the configured number of probe datagrams to every target,
/// then collects replies until the response window closes, invoking the
/// callback once per decodable reply. Zero replies is not an error, and no
/// deduplication is performed: a device that answers every probe is
/// reported once per answer.
#[derive(Clone)]
pub struct BroadcastDiscoverer {
    targets: Vec<SocketAddr>,
    packets_per_round: u32,
    response_window: Duration,
    protocol: Arc<dyn DiscoveryProtocol>,
}

impl BroadcastDiscoverer {
    pub fn new(
        targets: Vec<SocketAddr>,
        packets_per_round: u32,
        response_window: Duration,
        protocol: Arc<dyn DiscoveryProtocol>,
    ) -> Self {
        Self {
            targets,
            packets_per_round,
            response_window,
            protocol,
        }
    }

    /// Run one discovery round, calling `on_device` per decoded reply.
    ///
    /// Returns `Err` only for transport failures (bind/send); the caller is
    /// expected to log and carry on, treating the round as empty.
    pub async fn discover<F>(&self, on_device: F) -> Result<(), DiscoveryError>
    where
        F: Fn(DeviceRecord),
    {
        let socket = create_broadcast_socket().map_err(DiscoveryError::Bind)?;
        let socket = UdpSocket::from_std(socket).map_err(DiscoveryError::Bind)?;

        let probe = self.protocol.probe_payload();
        for _ in 0..self.packets_per_round {
            for target in &self.targets {
                socket
                    .send_to(&probe, target)
                    .await
                    .map_err(|source| DiscoveryError::Send {
                        target: *target,
                        source,
                    })?;
            }
        }
        debug!(
            targets = self.targets.len(),
            packets = self.packets_per_round,
            "discovery probes sent"
        );

        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        let deadline = Instant::now() + self.response_window;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            match timeout(remaining.min(RECEIVE_TIMEOUT), socket.recv_from(&mut buf)).await {
                Ok(Ok((len, addr))) => match self.protocol.parse_reply(&buf[..len], addr.ip()) {
                    Some(record) => on_device(record),
                    None => debug!(source = %addr, "dropping undecodable discovery reply"),
                },
                Ok(Err(e)) => {
                    warn!("UDP receive error: {}", e);
                }
                Err(_) => {
                    // Timeout slice elapsed, re-check the deadline
                }
            }
        }

        Ok(())
    }
}
