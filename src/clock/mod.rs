// ============================================================================
// Clocks and write-time resolution
// ============================================================================
//
// All times are signed 64-bit microseconds. The clock only supplies physical
// readings; `TimestampResolver` turns them into strictly increasing proposal
// times per execution context and attaches them to every write.
//
// ============================================================================

pub mod resolver;
pub mod stamp;

pub use resolver::{ResolvedTimestamp, TimestampResolver};
pub use stamp::{TimestampSource, WriteStamp};

use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

pub const MICROS_PER_SECOND: i64 = 1_000_000;

/// Reserved minimum: never accepted as an explicit write-time.
pub const MIN_TIMESTAMP: i64 = i64::MIN;

/// Reserved maximum: accepted, but yields to later implicit writes.
pub const MAX_TIMESTAMP: i64 = i64::MAX;

/// Source of physical time in microseconds.
pub trait Clock: Send + Sync + Debug {
    fn now_micros(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_micros(&self) -> i64 {
        chrono::Utc::now().timestamp_micros()
    }
}

/// Clock that only moves when told to. Used to drive expiry deterministically.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_micros: i64) -> Self {
        Self {
            now: AtomicI64::new(start_micros),
        }
    }

    /// Starts at the current wall-clock time.
    pub fn starting_now() -> Self {
        Self::new(SystemClock.now_micros())
    }

    pub fn advance(&self, by: Duration) {
        let micros = i64::try_from(by.as_micros()).unwrap_or(i64::MAX);
        self.now
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |now| {
                Some(now.saturating_add(micros))
            })
            .ok();
    }

    pub fn set(&self, micros: i64) {
        self.now.store(micros, Ordering::Release);
    }
}

impl Clock for ManualClock {
    fn now_micros(&self) -> i64 {
        self.now.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        clock.advance(Duration::from_secs(2));
        assert_eq!(clock.now_micros(), 1_000 + 2 * MICROS_PER_SECOND);
        clock.set(5);
        assert_eq!(clock.now_micros(), 5);
    }

    #[test]
    fn test_system_clock_is_in_microseconds() {
        // 2020-01-01T00:00:00Z in microseconds.
        assert!(SystemClock.now_micros() > 1_577_836_800_000_000);
    }
}
