use crate::clock::{MICROS_PER_SECOND, WriteStamp};
use crate::core::Value;
use serde::{Deserialize, Serialize};

/// Addresses one register inside a row. The liveness marker is a cell like
/// any other, it just has no user-visible column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CellKey {
    LivenessMarker,
    Column(String),
}

impl CellKey {
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(name.into())
    }
}

/// What a version holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Non-null column value.
    Value(Value),
    /// Row-existence proof written by row-creating statements.
    Marker,
    /// Null write or delete.
    Tombstone,
}

impl Payload {
    /// Null column writes collapse into tombstones.
    pub fn from_value(value: Value) -> Self {
        if value.is_null() {
            Self::Tombstone
        } else {
            Self::Value(value)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expiry {
    Never,
    At(i64),
}

impl Expiry {
    /// Absolute expiry `ttl_seconds` after `issued_at`. `None` and `Some(0)`
    /// never expire.
    pub fn after(issued_at: i64, ttl_seconds: Option<u64>) -> Self {
        match ttl_seconds {
            None | Some(0) => Self::Never,
            Some(ttl) => {
                let micros = i64::try_from(ttl)
                    .unwrap_or(i64::MAX)
                    .saturating_mul(MICROS_PER_SECOND);
                Self::At(issued_at.saturating_add(micros))
            }
        }
    }

    pub fn is_live_at(&self, read_time: i64) -> bool {
        match self {
            Self::Never => true,
            Self::At(expires_at) => *expires_at > read_time,
        }
    }

    /// Whole seconds left at `read_time`, rounded up. `None` for `Never`.
    pub fn remaining_seconds(&self, read_time: i64) -> Option<i64> {
        match self {
            Self::Never => None,
            Self::At(expires_at) => {
                let left = expires_at.saturating_sub(read_time).max(0);
                Some((left + MICROS_PER_SECOND - 1) / MICROS_PER_SECOND)
            }
        }
    }
}

/// The single current version of a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub payload: Payload,
    pub stamp: WriteStamp,
    pub expiry: Expiry,
}

impl Version {
    pub fn new(payload: Payload, stamp: WriteStamp, expiry: Expiry) -> Self {
        Self {
            payload,
            stamp,
            expiry,
        }
    }

    /// Tombstones never expire; they stop masking only when superseded.
    pub fn tombstone(stamp: WriteStamp) -> Self {
        Self::new(Payload::Tombstone, stamp, Expiry::Never)
    }

    /// Visible non-null value at `read_time`.
    pub fn value_at(&self, read_time: i64) -> Option<&Value> {
        match &self.payload {
            Payload::Value(value) if self.expiry.is_live_at(read_time) => Some(value),
            _ => None,
        }
    }

    pub fn is_marker_live_at(&self, read_time: i64) -> bool {
        matches!(self.payload, Payload::Marker) && self.expiry.is_live_at(read_time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Incoming version replaced the stored one (or created the cell).
    Applied,
    /// Incoming version lost to the stored one and was dropped.
    Discarded,
}

/// Last-writer-wins merge of `incoming` into `slot`. The whole version is
/// replaced or nothing is.
pub fn merge_version(slot: &mut Option<Version>, incoming: Version) -> MergeOutcome {
    if let Some(stored) = slot.as_ref()
        && !incoming.stamp.supersedes(&stored.stamp)
    {
        return MergeOutcome::Discarded;
    }
    *slot = Some(incoming);
    MergeOutcome::Applied
}
