//! Host monotonic clock.
//!
//! The control core only ever sees plain `now_ms` values; this adapter
//! turns `std::time::Instant` into milliseconds since construction.

use std::time::Instant;

/// Milliseconds since the clock was created.  Never goes backwards.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
