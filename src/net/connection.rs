//! Backend socket bookkeeping.
//!
//! Every System I call opens exactly one socket. The transport wraps it in a
//! [`SocketLease`] so the open-socket gauge and the log line on close cannot
//! be skipped, whichever way the call ends.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::observability::metrics;

static NEXT_SOCKET: AtomicU64 = AtomicU64::new(1);

/// Process-wide sequence number of a backend socket, shown as `sysi-N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SocketId(u64);

impl SocketId {
    fn next() -> Self {
        Self(NEXT_SOCKET.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for SocketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sysi-{}", self.0)
    }
}

/// Open-socket counter shared by clones of one transport.
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    open: Arc<AtomicU64>,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a socket just dialed to `address`.
    pub fn track(&self, address: &str) -> SocketLease {
        let id = SocketId::next();
        let open = self.open.fetch_add(1, Ordering::AcqRel) + 1;
        metrics::backend_connection_opened();
        tracing::trace!(socket = %id, address, open, "System I socket opened");
        SocketLease { id, address: address.to_string(), opened_at: Instant::now(), open: Arc::clone(&self.open) }
    }

    pub fn active_count(&self) -> u64 {
        self.open.load(Ordering::Acquire)
    }
}

/// Held for as long as one socket is open.
#[derive(Debug)]
pub struct SocketLease {
    id: SocketId,
    address: String,
    opened_at: Instant,
    open: Arc<AtomicU64>,
}

impl SocketLease {
    pub fn id(&self) -> SocketId {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Drop for SocketLease {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::AcqRel);
        metrics::backend_connection_closed();
        tracing::trace!(
            socket = %self.id,
            address = %self.address,
            held_ms = self.opened_at.elapsed().as_millis() as u64,
            "System I socket closed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_and_display_with_prefix() {
        let tracker = ConnectionTracker::new();
        let a = tracker.track("127.0.0.1:7001");
        let b = tracker.track("127.0.0.1:7001");
        assert!(b.id() > a.id());
        assert!(a.id().to_string().starts_with("sysi-"));
        assert_eq!(a.address(), "127.0.0.1:7001");
    }

    #[test]
    fn leases_release_on_drop_in_any_order() {
        let tracker = ConnectionTracker::new();
        let shared = tracker.clone();

        let first = tracker.track("127.0.0.1:7001");
        let second = shared.track("127.0.0.1:7002");
        assert_eq!(tracker.active_count(), 2);

        drop(first);
        assert_eq!(shared.active_count(), 1);
        drop(second);
        assert_eq!(tracker.active_count(), 0);
    }
}
