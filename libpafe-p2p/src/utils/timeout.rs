//! Timeout helpers used across the crate.
//!
//! The link timer reads time through the [`Clock`] trait so the LLCP
//! supervision logic can be driven by a manual clock in tests.

use std::time::{Duration, Instant};

/// Default read timeout in milliseconds used by transports when a caller
/// doesn't provide an explicit timeout.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

/// Convert milliseconds to Duration.
pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Convenience: default read timeout as Duration.
pub fn default_read_timeout() -> Duration {
    ms(DEFAULT_READ_TIMEOUT_MS)
}

/// Monotonic millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Clock backed by `std::time::Instant`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// One-shot timer armed with the negotiated link timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkTimer {
    started_ms: u64,
    timeout_ms: u64,
    armed: bool,
}

impl LinkTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, clock: &dyn Clock, timeout_ms: u16) {
        self.started_ms = clock.now_ms();
        self.timeout_ms = u64::from(timeout_ms);
        self.armed = true;
    }

    pub fn stop(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// True once `timeout_ms` has elapsed since `start`. A stopped timer
    /// never expires.
    pub fn is_expired(&self, clock: &dyn Clock) -> bool {
        self.armed && clock.now_ms().saturating_sub(self.started_ms) >= self.timeout_ms
    }
}
