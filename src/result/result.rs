use crate::core::{RowKey, Value};
use crate::storage::MergeStats;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One visible row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowResult {
    pub key: RowKey,
    /// Requested columns in request order; null where nothing is visible.
    pub values: Vec<(String, Value)>,
    pub writetimes: BTreeMap<String, i64>,
    /// Remaining seconds, `None` when the column never expires or is null.
    pub ttls: BTreeMap<String, Option<i64>>,
}

impl RowResult {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn is_null(&self, column: &str) -> bool {
        self.get(column).is_none_or(Value::is_null)
    }

    pub fn writetime(&self, column: &str) -> Option<i64> {
        self.writetimes.get(column).copied()
    }

    pub fn ttl(&self, column: &str) -> Option<i64> {
        self.ttls.get(column).copied().flatten()
    }
}

/// Outcome of projecting a single row.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Absent,
    Row(RowResult),
}

impl Projection {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn row(&self) -> Option<&RowResult> {
        match self {
            Self::Row(row) => Some(row),
            Self::Absent => None,
        }
    }

    pub fn into_row(self) -> Option<RowResult> {
        match self {
            Self::Row(row) => Some(row),
            Self::Absent => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadResult {
    pub columns: Vec<String>,
    pub rows: Vec<RowResult>,
    /// The single read time every row and column was evaluated at.
    pub read_time: i64,
}

impl ReadResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&RowResult> {
        self.rows.first()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for ReadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() {
            return writeln!(f, "Empty result set");
        }

        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.values.iter().map(|(_, v)| v.to_string()).collect())
            .collect();

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.len()).collect();
        for row in &cells {
            for (i, value) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(value.len());
                }
            }
        }

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, width)| format!("{:width$}", col, width = *width))
            .collect();
        writeln!(f, "{}", header.join(" | "))?;

        let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", separator.join("-+-"))?;

        for row in &cells {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(val, width)| format!("{:width$}", val, width = *width))
                .collect();
            writeln!(f, "{}", line.join(" | "))?;
        }

        writeln!(f, "\n{} row(s)", self.rows.len())
    }
}

/// What a mutation did to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MutationOutcome {
    /// Write-time the statement resolved to.
    pub write_time: i64,
    pub stats: MergeStats,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Mutation(MutationOutcome),
    Rows(ReadResult),
}

impl QueryResult {
    pub fn into_rows(self) -> Option<ReadResult> {
        match self {
            Self::Rows(rows) => Some(rows),
            Self::Mutation(_) => None,
        }
    }

    pub fn into_mutation(self) -> Option<MutationOutcome> {
        match self {
            Self::Mutation(outcome) => Some(outcome),
            Self::Rows(_) => None,
        }
    }
}
