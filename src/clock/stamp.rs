use super::MAX_TIMESTAMP;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Whether the write-time was supplied by the statement or taken from the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimestampSource {
    Explicit,
    Implicit,
}

/// Conflict-resolution key attached to every cell version.
///
/// Stamps form a total order, so merging a set of versions yields the same
/// winner whatever order they arrive in:
///
/// 1. `rank`: the write-time, except that an explicit write at
///    [`MAX_TIMESTAMP`] ranks at the clock reading it was proposed at. It
///    therefore beats every write proposed before it and loses to implicit
///    writes proposed afterwards. It also loses to any explicit write-time
///    above that reading, `MAX_TIMESTAMP - 1` included: an implicit write
///    sits at its own reading, so an order that let later implicit writes
///    through but held the sentinel above every explicit write would have
///    cycles.
/// 2. `proposed_at`: strictly increasing per session, so of two statements
///    with the same write-time the newer one wins.
/// 3. `origin`: the proposing session, separating equal readings taken by
///    different sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WriteStamp {
    write_time: i64,
    source: TimestampSource,
    proposed_at: i64,
    origin: u64,
}

impl WriteStamp {
    pub fn explicit(write_time: i64, proposed_at: i64, origin: u64) -> Self {
        Self {
            write_time,
            source: TimestampSource::Explicit,
            proposed_at,
            origin,
        }
    }

    pub fn implicit(proposed_at: i64, origin: u64) -> Self {
        Self {
            write_time: proposed_at,
            source: TimestampSource::Implicit,
            proposed_at,
            origin,
        }
    }

    /// The write-time reported by `writetime()`.
    pub fn write_time(&self) -> i64 {
        self.write_time
    }

    pub fn source(&self) -> TimestampSource {
        self.source
    }

    pub fn proposed_at(&self) -> i64 {
        self.proposed_at
    }

    pub fn origin(&self) -> u64 {
        self.origin
    }

    pub fn is_max_sentinel(&self) -> bool {
        self.source == TimestampSource::Explicit && self.write_time == MAX_TIMESTAMP
    }

    fn rank(&self) -> i64 {
        if self.is_max_sentinel() {
            self.proposed_at
        } else {
            self.write_time
        }
    }

    /// True if a version carrying `self` replaces one carrying `stored`.
    pub fn supersedes(&self, stored: &WriteStamp) -> bool {
        self > stored
    }
}

impl Ord for WriteStamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank()
            .cmp(&other.rank())
            .then(self.proposed_at.cmp(&other.proposed_at))
            .then(self.origin.cmp(&other.origin))
            .then(self.write_time.cmp(&other.write_time))
            .then(self.source.cmp(&other.source))
    }
}

impl PartialOrd for WriteStamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
