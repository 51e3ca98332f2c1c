//! OSC UDP listener.
//!
//! Owns the socket and a receive thread. Each datagram is decoded in full,
//! then its pose updates are written to the camera state store. A malformed
//! datagram is logged and dropped without touching the store.
//!
//! The socket uses a read timeout equal to the poll interval so the thread
//! can notice `close`. `close` joins the thread: once it returns no further
//! datagram reaches the store.

use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use crate::camera::CameraStateStore;
use crate::error::{Error, Result};
use crate::osc::decode_pose_updates;
use crate::{cam_debug, cam_error, cam_info, cam_warn};

const SOURCE: &str = "oscam::Listener";

/// Largest datagram the listener reads (UDP maximum)
pub const MAX_DATAGRAM_SIZE: usize = 65536;

/// Default receive poll interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Datagram counters, updated by the receive thread
#[derive(Debug, Default)]
pub struct ListenerStats {
    received: AtomicU64,
    applied: AtomicU64,
    dropped: AtomicU64,
}

/// Point-in-time copy of `ListenerStats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerStatsSnapshot {
    /// Datagrams read from the socket
    pub received: u64,
    /// Pose updates written to the store
    pub applied: u64,
    /// Datagrams rejected by the decoder
    pub dropped: u64,
}

impl ListenerStats {
    pub fn snapshot(&self) -> ListenerStatsSnapshot {
        ListenerStatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            applied: self.applied.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Decode one datagram and apply its pose updates
///
/// Returns the number of updates written. Nothing is written on error.
pub fn handle_datagram(store: &CameraStateStore, datagram: &[u8]) -> Result<usize> {
    let updates = decode_pose_updates(datagram)?;
    store.apply(&updates);
    Ok(updates.len())
}

/// Running UDP listener
pub struct OscListener {
    local_addr: SocketAddr,
    running: Arc<AtomicBool>,
    stats: Arc<ListenerStats>,
    worker: Option<JoinHandle<()>>,
}

impl OscListener {
    /// Bind `bind_address:port` and start the receive thread
    ///
    /// Port 0 binds an ephemeral port; see `local_addr`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the socket cannot be bound or configured, and
    /// `Error::InitializationFailed` if the thread cannot be spawned.
    pub fn open(
        bind_address: &str,
        port: u16,
        store: Arc<CameraStateStore>,
        poll_interval: Duration,
    ) -> Result<Self> {
        let socket = UdpSocket::bind((bind_address, port)).map_err(|e| {
            cam_error!(SOURCE, "Cannot bind UDP {}:{}: {}", bind_address, port, e);
            Error::Io(format!("bind {}:{}: {}", bind_address, port, e))
        })?;

        // A zero timeout means "block forever" to the OS; never allow it
        let poll_interval = poll_interval.max(Duration::from_millis(1));
        socket.set_read_timeout(Some(poll_interval))?;
        let local_addr = socket.local_addr()?;

        let running = Arc::new(AtomicBool::new(true));
        let stats = Arc::new(ListenerStats::default());

        let worker = {
            let running = running.clone();
            let stats = stats.clone();
            thread::Builder::new()
                .name("oscam-listener".into())
                .spawn(move || receive_loop(socket, store, running, stats))
                .map_err(|e| Error::InitializationFailed(format!("listener thread: {}", e)))?
        };

        cam_info!(SOURCE, "Listening for OSC on UDP {}", local_addr);

        Ok(Self {
            local_addr,
            running,
            stats,
            worker: Some(worker),
        })
    }

    /// Address the socket is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_open(&self) -> bool {
        self.worker.is_some()
    }

    pub fn stats(&self) -> ListenerStatsSnapshot {
        self.stats.snapshot()
    }

    /// Stop the receive thread and wait for it
    ///
    /// Blocks for at most one poll interval. Idempotent.
    pub fn close(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                cam_error!(SOURCE, "Listener thread panicked");
            }
            cam_info!(SOURCE, "Closed UDP {}", self.local_addr);
        }
    }
}

impl Drop for OscListener {
    fn drop(&mut self) {
        self.close();
    }
}

fn receive_loop(
    socket: UdpSocket,
    store: Arc<CameraStateStore>,
    running: Arc<AtomicBool>,
    stats: Arc<ListenerStats>,
) {
    let mut buffer = vec![0u8; MAX_DATAGRAM_SIZE];

    while running.load(Ordering::Relaxed) {
        let (len, from) = match socket.recv_from(&mut buffer) {
            Ok(result) => result,
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => continue,
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
            Err(e) => {
                // e.g. ICMP port unreachable reported as ConnectionReset on Windows
                cam_debug!(SOURCE, "UDP recv error: {}", e);
                continue;
            }
        };

        // Closed while blocked in recv: drop the late datagram
        if !running.load(Ordering::Relaxed) {
            break;
        }

        stats.received.fetch_add(1, Ordering::Relaxed);
        match handle_datagram(&store, &buffer[..len]) {
            Ok(applied) => {
                stats.applied.fetch_add(applied as u64, Ordering::Relaxed);
            }
            Err(e) => {
                stats.dropped.fetch_add(1, Ordering::Relaxed);
                cam_warn!(SOURCE, "Dropped {}-byte datagram from {}: {}", len, from, e);
            }
        }
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
