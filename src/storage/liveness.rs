// ============================================================================
// Liveness Tracker
// ============================================================================
//
// The liveness marker proves a row exists independently of its column values.
// Only row-creating statements (INSERT) write it. It merges exactly like a
// column cell, so marker and columns share one comparison rule.
//
// ============================================================================

use super::cell::{CellKey, Expiry, MergeOutcome, Payload, Version};
use super::row::RowCells;
use crate::clock::WriteStamp;

impl RowCells {
    pub fn mark_alive(&mut self, stamp: WriteStamp, expiry: Expiry) -> MergeOutcome {
        self.merge(
            CellKey::LivenessMarker,
            Version::new(Payload::Marker, stamp, expiry),
        )
    }

    pub fn is_alive(&self, read_time: i64) -> bool {
        self.cells
            .get(&CellKey::LivenessMarker)
            .is_some_and(|marker| marker.is_marker_live_at(read_time))
    }

    pub fn liveness(&self) -> Option<&Version> {
        self.cells.get(&CellKey::LivenessMarker)
    }

    /// Row-level delete: a null write at `stamp` into the marker and every
    /// column cell. Returns how many registers the tombstone won.
    pub fn tombstone(&mut self, stamp: WriteStamp) -> usize {
        if self.row_tombstone.is_none_or(|existing| stamp.supersedes(&existing)) {
            self.row_tombstone = Some(stamp);
        }

        let mut keys: Vec<CellKey> = self.cells.keys().cloned().collect();
        if !self.cells.contains_key(&CellKey::LivenessMarker) {
            keys.push(CellKey::LivenessMarker);
        }

        let mut won = 0;
        for key in keys {
            if self.merge(key, Version::tombstone(stamp)) == MergeOutcome::Applied {
                won += 1;
            }
        }
        won
    }
}
