use crate::core::Value;
use serde::{Deserialize, Serialize};

/// Which rows a read looks at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowSelector {
    /// One row by its full primary key.
    Key(Vec<(String, Value)>),
    /// Every row of one partition, in clustering order.
    Partition(Vec<(String, Value)>),
    /// Whole table.
    All,
}

/// A structured `SELECT`.
///
/// An empty `columns` list selects every column in schema order. The read
/// time defaults to the session clock and is taken once for the whole read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadRequest {
    pub table: String,
    pub selector: RowSelector,
    pub columns: Vec<String>,
    pub writetime_columns: Vec<String>,
    pub ttl_columns: Vec<String>,
    pub read_time: Option<i64>,
}

impl ReadRequest {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            selector: RowSelector::All,
            columns: Vec::new(),
            writetime_columns: Vec::new(),
            ttl_columns: Vec::new(),
            read_time: None,
        }
    }

    /// Adds a primary key component and narrows the read to one row.
    pub fn key(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        let entry = (column.into(), value.into());
        match &mut self.selector {
            RowSelector::Key(parts) => parts.push(entry),
            _ => self.selector = RowSelector::Key(vec![entry]),
        }
        self
    }

    /// Adds a partition key component and narrows the read to one partition.
    pub fn partition(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        let entry = (column.into(), value.into());
        match &mut self.selector {
            RowSelector::Partition(parts) => parts.push(entry),
            _ => self.selector = RowSelector::Partition(vec![entry]),
        }
        self
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// `writetime(column)`
    ///
    /// Fails the whole read with [`DbError::NoValue`] if any selected row has
    /// no visible value in `column`, including rows inside a partition or
    /// full scan. Use [`ttl`](Self::ttl), which yields null, to probe sparse
    /// columns.
    ///
    /// [`DbError::NoValue`]: crate::DbError::NoValue
    pub fn writetime(mut self, column: impl Into<String>) -> Self {
        self.writetime_columns.push(column.into());
        self
    }

    /// `ttl(column)`
    pub fn ttl(mut self, column: impl Into<String>) -> Self {
        self.ttl_columns.push(column.into());
        self
    }

    pub fn at(mut self, read_time: i64) -> Self {
        self.read_time = Some(read_time);
        self
    }
}
