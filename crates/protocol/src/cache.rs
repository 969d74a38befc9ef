//! Handshake result cache
//!
//! Reusing a handshake saves one round trip per request. The device stamp
//! keeps ticking once per second, so a cached result is projected forward
//! by the time elapsed since it was learned. Disabled (no TTL) means every
//! request runs a fresh handshake.

use crate::handshake::HandshakeResult;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct HandshakeCache {
    ttl: Option<Duration>,
    entry: Option<(HandshakeResult, Instant)>,
}

impl HandshakeCache {
    /// Create a cache; `None` disables caching
    pub fn new(ttl: Option<Duration>) -> Self {
        Self { ttl, entry: None }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// A still-fresh result, its stamp advanced to `now`
    pub fn get(&self, now: Instant) -> Option<HandshakeResult> {
        let ttl = self.ttl?;
        let (result, learned_at) = self.entry?;

        let elapsed = now.saturating_duration_since(learned_at);
        if elapsed < ttl {
            Some(result.advanced_by(elapsed))
        } else {
            None
        }
    }

    /// Remember a result learned at `at`. No-op when caching is disabled.
    pub fn store(&mut self, result: HandshakeResult, at: Instant) {
        if self.ttl.is_some() {
            self.entry = Some((result, at));
        }
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
