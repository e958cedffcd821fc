//! Time abstraction
//!
//! The control loop timestamps every tick through `TimeSource` so timing
//! behavior (stabilization deadlines in particular) can be tested on the
//! host with a controllable clock.

use core::cell::Cell;

/// Monotonic time source for control loops and deadlines.
pub trait TimeSource {
    /// Current time in milliseconds since an arbitrary epoch.
    fn now_ms(&self) -> u64;

    /// Elapsed milliseconds since a reference point, saturating at zero.
    fn elapsed_since(&self, reference_ms: u64) -> u64 {
        self.now_ms().saturating_sub(reference_ms)
    }
}

/// Mock time source with controllable advancement, for tests.
#[derive(Debug, Clone, Default)]
pub struct MockTime {
    current_ms: Cell<u64>,
}

impl MockTime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the clock to an absolute value.
    pub fn set(&self, ms: u64) {
        self.current_ms.set(ms);
    }

    /// Advance the clock by `ms` milliseconds.
    pub fn advance(&self, ms: u64) {
        self.current_ms.set(self.current_ms.get() + ms);
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.current_ms.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_time_starts_at_zero() {
        let time = MockTime::new();
        assert_eq!(time.now_ms(), 0);
    }

    #[test]
    fn mock_time_advances() {
        let time = MockTime::new();
        time.advance(500);
        time.advance(250);
        assert_eq!(time.now_ms(), 750);
    }

    #[test]
    fn elapsed_since_saturates() {
        let time = MockTime::new();
        time.set(1_000);
        assert_eq!(time.elapsed_since(400), 600);
        // Reference in the "future" saturates to zero
        assert_eq!(time.elapsed_since(5_000), 0);
    }
}
