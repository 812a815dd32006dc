use super::{Clock, MAX_TIMESTAMP, MIN_TIMESTAMP, WriteStamp};
use crate::core::{DbError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Outcome of resolving a statement's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTimestamp {
    /// Conflict-resolution key for every cell the statement writes.
    pub stamp: WriteStamp,
    /// Physical clock reading the statement's TTL counts from.
    pub issued_at: i64,
}

impl ResolvedTimestamp {
    pub fn write_time(&self) -> i64 {
        self.stamp.write_time()
    }
}

/// Per-session resolver: hands out strictly increasing proposal times and
/// validates explicit timestamps.
#[derive(Debug)]
pub struct TimestampResolver {
    clock: Arc<dyn Clock>,
    last_proposed: AtomicI64,
    origin: u64,
}

impl TimestampResolver {
    pub fn new(clock: Arc<dyn Clock>, origin: u64) -> Self {
        Self {
            clock,
            last_proposed: AtomicI64::new(i64::MIN),
            origin,
        }
    }

    pub fn origin(&self) -> u64 {
        self.origin
    }

    /// Current physical time. Used as the default read time.
    pub fn now(&self) -> i64 {
        self.clock.now_micros()
    }

    /// Narrows a timestamp literal to the 64-bit domain.
    pub fn check_literal(literal: i128) -> Result<i64> {
        let value = i64::try_from(literal).map_err(|_| DbError::TimestampOutOfRange(literal))?;
        Self::check_explicit(value)?;
        Ok(value)
    }

    fn check_explicit(value: i64) -> Result<()> {
        if value == MIN_TIMESTAMP {
            return Err(DbError::InvalidTimestamp(value));
        }
        Ok(())
    }

    pub fn resolve(&self, explicit: Option<i64>) -> Result<ResolvedTimestamp> {
        if let Some(value) = explicit {
            Self::check_explicit(value)?;
        }

        let issued_at = self.clock.now_micros();
        let proposed_at = self.next_proposal(issued_at);
        let stamp = match explicit {
            Some(MAX_TIMESTAMP) => {
                log::warn!(
                    "explicit timestamp at the reserved maximum ranks at {}; later implicit writes and higher explicit timestamps replace it",
                    proposed_at
                );
                WriteStamp::explicit(MAX_TIMESTAMP, proposed_at, self.origin)
            }
            Some(value) => WriteStamp::explicit(value, proposed_at, self.origin),
            None => WriteStamp::implicit(proposed_at, self.origin),
        };

        Ok(ResolvedTimestamp { stamp, issued_at })
    }

    // max(now, last + 1), published with a CAS loop so concurrent statements
    // on one session never observe the same value.
    fn next_proposal(&self, now: i64) -> i64 {
        let mut last = self.last_proposed.load(Ordering::Acquire);
        loop {
            let next = now.max(last.saturating_add(1));
            match self.last_proposed.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}
