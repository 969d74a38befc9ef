//! Absolute I/O deadlines mapped onto relative socket timeouts

use crate::error::ConnectionError;
use std::time::{Duration, Instant};

/// Read and write deadlines; `None` means block indefinitely
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadlines {
    pub read: Option<Instant>,
    pub write: Option<Instant>,
}

impl Deadlines {
    /// A handshake is part of a write but waits on a read; bound it by
    /// whichever deadline comes first
    pub fn handshake(&self) -> Option<Instant> {
        match (self.read, self.write) {
            (Some(r), Some(w)) => Some(r.min(w)),
            (r, w) => r.or(w),
        }
    }
}

/// Socket timeout left until `deadline`, or `DeadlineExceeded` if it passed
pub fn remaining(deadline: Option<Instant>, now: Instant) -> Result<Option<Duration>, ConnectionError> {
    match deadline {
        None => Ok(None),
        Some(deadline) if deadline > now => Ok(Some(deadline - now)),
        Some(_) => Err(ConnectionError::DeadlineExceeded),
    }
}
