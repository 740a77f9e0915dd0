//! The bounded, fire-and-forget UDP sender.
//!
//! Telemetry must never apply backpressure to request handling: the
//! channel is bounded and a full channel simply drops the newest
//! record, counting the drop rather than blocking the caller.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::record::{DiscoveryRecord, PerfRecord};

const CHANNEL_CAPACITY: usize = 1024;

enum Outbound {
    Perf(PerfRecord),
    Discovery(DiscoveryRecord),
}

/// Counts of records dropped because the channel was full, exposed for
/// `/mcp-info` or metrics scraping.
#[derive(Debug, Default)]
pub struct DropCounter {
    dropped: AtomicU64,
}

impl DropCounter {
    /// Total records dropped since startup.
    pub fn count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn increment(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }
}

/// A cheaply-cloneable handle used to submit telemetry from request
/// handlers; the actual socket send happens on a background task so
/// callers never await I/O.
#[derive(Clone)]
pub struct TelemetryEmitter {
    sender: mpsc::Sender<Outbound>,
    drops: Arc<DropCounter>,
    server_id: Uuid,
}

impl TelemetryEmitter {
    /// Spawns the background sender task and returns a handle to it.
    ///
    /// `target` is the collector's address. When `target`'s IP is a
    /// multicast address the socket joins that group before sending;
    /// otherwise it sends unicast datagrams as a plain client socket.
    /// `server_id` is this server instance's stable id, stamped on every
    /// record this emitter sends.
    ///
    /// # Errors
    ///
    /// Returns an error if the local UDP socket cannot be bound.
    pub async fn spawn(target: SocketAddr, server_id: Uuid) -> std::io::Result<Self> {
        let bind_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0);
        let socket = UdpSocket::bind(bind_addr).await?;

        if let IpAddr::V4(addr) = target.ip() {
            if addr.is_multicast() {
                socket.join_multicast_v4(addr, Ipv4Addr::UNSPECIFIED)?;
            }
        }

        let (sender, mut receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let drops = Arc::new(DropCounter::default());

        tokio::spawn(async move {
            while let Some(outbound) = receiver.recv().await {
                let payload = match &outbound {
                    Outbound::Perf(record) => record.to_bounded_json(),
                    Outbound::Discovery(record) => record.to_bounded_json(),
                };
                if let Err(err) = socket.send_to(&payload, target).await {
                    debug!(%err, "telemetry send failed, dropping record");
                }
            }
        });

        Ok(Self { sender, drops, server_id })
    }

    /// This server instance's stable id, as stamped on every record.
    #[must_use]
    pub const fn server_id(&self) -> Uuid {
        self.server_id
    }

    /// Submits a perf record. Never blocks; drops silently (incrementing
    /// the drop counter) when the channel is full.
    pub fn emit_perf(&self, record: PerfRecord) {
        self.try_send(Outbound::Perf(record));
    }

    /// Submits a discovery record. Never blocks.
    pub fn emit_discovery(&self, record: DiscoveryRecord) {
        self.try_send(Outbound::Discovery(record));
    }

    /// Total records dropped since this emitter was spawned.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.drops.count()
    }

    fn try_send(&self, outbound: Outbound) {
        if self.sender.try_send(outbound).is_err() {
            self.drops.increment();
            warn!(total_dropped = self.drops.count(), "telemetry channel full, dropping record");
        }
    }
}
