//! Sliding-window request limiting keyed by client address.
//!
//! The limiter is an explicitly owned component injected into the router
//! state rather than ambient global state, so it can be unit-tested and
//! swapped for a distributed implementation later. One mutex guards the
//! per-client timestamp map, making check-and-record atomic: concurrent
//! requests from the same client cannot race more than the configured burst
//! through.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Counts requests per client within a trailing time window.
pub struct SlidingWindowLimiter {
    max_requests: usize,
    window: Duration,
    clients: Mutex<HashMap<IpAddr, Vec<Instant>>>,
}

impl SlidingWindowLimiter {
    /// Create a limiter allowing `max_requests` per client per `window`.
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Record a request from `client` and report whether it is allowed.
    ///
    /// Returns `false` when the client already has `max_requests` requests
    /// inside the trailing window; the rejected request is not recorded.
    pub fn try_acquire(&self, client: IpAddr) -> bool {
        self.try_acquire_at(client, Instant::now())
    }

    fn try_acquire_at(&self, client: IpAddr, now: Instant) -> bool {
        let mut clients = self.clients.lock().expect("rate limiter state poisoned");
        // Entries from clients that have gone quiet age out of the map.
        clients.retain(|_, stamps| {
            stamps.retain(|stamp| now.duration_since(*stamp) < self.window);
            !stamps.is_empty()
        });

        let stamps = clients.entry(client).or_default();
        if stamps.len() >= self.max_requests {
            return false;
        }
        stamps.push(now);
        true
    }
}
