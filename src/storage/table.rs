use super::cell::{CellKey, MergeOutcome, Version};
use super::row::RowCells;
use crate::clock::WriteStamp;
use crate::core::{RowKey, TableSchema, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fully resolved effect of one statement on one row. Produced by the
/// mutation processor, or received from another replica, and applied with
/// [`Table::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowMutation {
    pub key: RowKey,
    /// Row-level delete at this stamp.
    pub row_tombstone: Option<WriteStamp>,
    pub writes: Vec<(CellKey, Version)>,
}

impl RowMutation {
    pub fn new(key: RowKey) -> Self {
        Self {
            key,
            row_tombstone: None,
            writes: Vec::new(),
        }
    }

    pub fn write(mut self, key: CellKey, version: Version) -> Self {
        self.writes.push((key, version));
        self
    }

    pub fn delete_row(mut self, stamp: WriteStamp) -> Self {
        self.row_tombstone = Some(stamp);
        self
    }
}

/// Counts of registers a mutation won and lost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    pub applied: usize,
    pub discarded: usize,
}

impl MergeStats {
    fn record(&mut self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Applied => self.applied += 1,
            MergeOutcome::Discarded => self.discarded += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    schema: TableSchema,
    rows: BTreeMap<RowKey, RowCells>,
}

impl Table {
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: BTreeMap::new(),
        }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Merges every register of `mutation`. Never fails: losing writes are
    /// dropped.
    pub fn apply(&mut self, mutation: &RowMutation) -> MergeStats {
        let row = self.rows.entry(mutation.key.clone()).or_default();
        let mut stats = MergeStats::default();

        if let Some(stamp) = mutation.row_tombstone {
            let won = row.tombstone(stamp);
            stats.applied += won;
            if won == 0 {
                stats.discarded += 1;
            }
        }

        for (key, version) in &mutation.writes {
            let outcome = row.merge(key.clone(), version.clone());
            if outcome == MergeOutcome::Discarded {
                log::trace!(
                    "table '{}' row {}: dropped {:?} write at {} (stored version is newer)",
                    self.schema.name(),
                    mutation.key,
                    key,
                    version.stamp.write_time()
                );
            }
            stats.record(outcome);
        }

        stats
    }

    pub fn row(&self, key: &RowKey) -> Option<&RowCells> {
        self.rows.get(key)
    }

    /// Rows of one partition in clustering order.
    pub fn partition<'a>(
        &'a self,
        partition: &'a [Value],
    ) -> impl Iterator<Item = (&'a RowKey, &'a RowCells)> + 'a {
        let start = RowKey::new(partition.to_vec(), Vec::new());
        self.rows
            .range(start..)
            .take_while(move |(key, _)| key.partition.as_slice() == partition)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&RowKey, &RowCells)> {
        self.rows.iter()
    }

    /// Stored row entries, including rows that are no longer visible.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Column, DataType};
    use crate::storage::cell::{Expiry, Payload};

    const NOW: i64 = 1_700_000_000_000_000;

    fn table() -> Table {
        Table::new(
            TableSchema::new(
                "t",
                vec![
                    Column::new("k", DataType::Integer).partition_key(),
                    Column::new("ck", DataType::Integer).clustering(),
                    Column::new("c", DataType::Integer),
                ],
            )
            .unwrap(),
        )
    }

    fn key(k: i64, ck: i64) -> RowKey {
        RowKey::new(vec![Value::from(k)], vec![Value::from(ck)])
    }

    fn insert(k: i64, ck: i64, c: i64, write_time: i64, seq: i64) -> RowMutation {
        let stamp = WriteStamp::explicit(write_time, NOW + seq, 1);
        RowMutation::new(key(k, ck))
            .write(
                CellKey::LivenessMarker,
                Version::new(Payload::Marker, stamp, Expiry::Never),
            )
            .write(
                CellKey::column("c"),
                Version::new(Payload::Value(Value::from(c)), stamp, Expiry::Never),
            )
    }

    #[test]
    fn test_apply_reports_merge_stats() {
        let mut table = table();
        let first = table.apply(&insert(1, 1, 3, 1000, 0));
        assert_eq!(first, MergeStats { applied: 2, discarded: 0 });

        let stale = table.apply(&insert(1, 1, 4, 500, 1));
        assert_eq!(stale, MergeStats { applied: 0, discarded: 2 });
        assert_eq!(
            table.row(&key(1, 1)).and_then(|r| r.value_at("c", NOW)),
            Some(&Value::from(3))
        );
    }

    #[test]
    fn test_stale_row_delete_is_counted_as_discarded() {
        let mut table = table();
        table.apply(&insert(1, 1, 3, 1000, 0));
        let stats = table.apply(&RowMutation::new(key(1, 1)).delete_row(WriteStamp::explicit(10, NOW + 1, 1)));
        assert_eq!(stats, MergeStats { applied: 0, discarded: 1 });
        assert!(table.row(&key(1, 1)).is_some_and(|r| r.exists_at(NOW)));
    }

    #[test]
    fn test_partition_scan_stays_in_partition() {
        let mut table = table();
        table.apply(&insert(1, 2, 12, 1000, 0));
        table.apply(&insert(1, 1, 11, 1000, 1));
        table.apply(&insert(2, 1, 21, 1000, 2));
        table.apply(&insert(0, 9, 9, 1000, 3));

        let partition = [Value::from(1)];
        let keys: Vec<RowKey> = table.partition(&partition).map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec![key(1, 1), key(1, 2)]);
        assert_eq!(table.rows().count(), 4);
    }
}
