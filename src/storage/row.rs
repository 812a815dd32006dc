use super::cell::{CellKey, MergeOutcome, Version, merge_version};
use crate::clock::WriteStamp;
use crate::core::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every register of one row: the liveness marker and the column cells.
///
/// The newest row-level delete is remembered so that a cell first written
/// after that delete, but carrying an older stamp, starts out masked. Without
/// it a late-arriving old write would appear or not depending on delivery
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCells {
    pub(super) cells: BTreeMap<CellKey, Version>,
    pub(super) row_tombstone: Option<WriteStamp>,
}

impl RowCells {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one version into the addressed cell.
    pub fn merge(&mut self, key: CellKey, incoming: Version) -> MergeOutcome {
        let seed = self.row_tombstone.map(Version::tombstone);
        let mut slot = self.cells.remove(&key).or(seed);
        let outcome = merge_version(&mut slot, incoming);
        if let Some(version) = slot {
            self.cells.insert(key, version);
        }
        outcome
    }

    pub fn cell(&self, key: &CellKey) -> Option<&Version> {
        self.cells.get(key)
    }

    pub fn column(&self, name: &str) -> Option<&Version> {
        self.cells.get(&CellKey::column(name))
    }

    /// Visible value of a column, `None` when null, expired or never written.
    pub fn value_at(&self, column: &str, read_time: i64) -> Option<&Value> {
        self.column(column).and_then(|v| v.value_at(read_time))
    }

    /// Write-time of the column's current version, whatever its payload.
    pub fn write_time(&self, column: &str) -> Option<i64> {
        self.column(column).map(|v| v.stamp.write_time())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Version)> {
        self.cells.iter().filter_map(|(key, version)| match key {
            CellKey::Column(name) => Some((name.as_str(), version)),
            CellKey::LivenessMarker => None,
        })
    }

    pub fn row_tombstone(&self) -> Option<&WriteStamp> {
        self.row_tombstone.as_ref()
    }

    /// The row exists iff its marker is alive or some column holds a live
    /// non-null value.
    pub fn exists_at(&self, read_time: i64) -> bool {
        self.is_alive(read_time)
            || self
                .columns()
                .any(|(_, version)| version.value_at(read_time).is_some())
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
