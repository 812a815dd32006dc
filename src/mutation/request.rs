use crate::core::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// Right-hand side of one column in a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignmentOp {
    /// `c = v`, `c = null`, or a value in an INSERT column list.
    Set(Value),
    /// `c = c + v`
    Append(Value),
    /// `c = v + c`
    Prepend(Value),
    /// `c = c - v`
    Remove(Value),
    /// `c[k] = v`
    SetElement { key: Value, value: Value },
    /// `DELETE c[k]`
    DeleteElement(Value),
    /// `DELETE c`
    Clear,
}

impl AssignmentOp {
    /// Operations addressing individual collection elements rather than the
    /// whole cell.
    pub fn is_element_op(&self) -> bool {
        matches!(
            self,
            Self::Append(_)
                | Self::Prepend(_)
                | Self::Remove(_)
                | Self::SetElement { .. }
                | Self::DeleteElement(_)
        )
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Set(_) => "assignment",
            Self::Append(_) => "append",
            Self::Prepend(_) => "prepend",
            Self::Remove(_) => "remove",
            Self::SetElement { .. } => "element assignment",
            Self::DeleteElement(_) => "element delete",
            Self::Clear => "column delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub column: String,
    pub op: AssignmentOp,
}

/// A parsed INSERT, UPDATE or DELETE against one row.
///
/// The timestamp is kept as a wide literal so a value outside the 64-bit
/// domain reaches validation instead of being silently truncated. For
/// DELETE, an empty assignment list deletes the whole row; `Clear` and
/// `DeleteElement` entries name column-level deletes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRequest {
    pub table: String,
    pub kind: StatementKind,
    pub key: Vec<(String, Value)>,
    pub timestamp: Option<i128>,
    pub ttl: Option<i64>,
    pub assignments: Vec<Assignment>,
}

impl MutationRequest {
    pub fn new(kind: StatementKind, table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            kind,
            key: Vec::new(),
            timestamp: None,
            ttl: None,
            assignments: Vec::new(),
        }
    }

    pub fn insert(table: impl Into<String>) -> Self {
        Self::new(StatementKind::Insert, table)
    }

    pub fn update(table: impl Into<String>) -> Self {
        Self::new(StatementKind::Update, table)
    }

    pub fn delete(table: impl Into<String>) -> Self {
        Self::new(StatementKind::Delete, table)
    }

    pub fn key(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.key.push((column.into(), value.into()));
        self
    }

    /// Column value of an INSERT.
    pub fn value(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.assign(column, AssignmentOp::Set(value.into()))
    }

    /// `SET column = value` of an UPDATE.
    pub fn set(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.assign(column, AssignmentOp::Set(value.into()))
    }

    pub fn set_null(self, column: impl Into<String>) -> Self {
        self.assign(column, AssignmentOp::Set(Value::Null))
    }

    pub fn append(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.assign(column, AssignmentOp::Append(value.into()))
    }

    pub fn prepend(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.assign(column, AssignmentOp::Prepend(value.into()))
    }

    pub fn remove(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.assign(column, AssignmentOp::Remove(value.into()))
    }

    pub fn set_element(
        self,
        column: impl Into<String>,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Self {
        self.assign(
            column,
            AssignmentOp::SetElement {
                key: key.into(),
                value: value.into(),
            },
        )
    }

    pub fn delete_element(self, column: impl Into<String>, key: impl Into<Value>) -> Self {
        self.assign(column, AssignmentOp::DeleteElement(key.into()))
    }

    /// Column named in a `DELETE c1, c2 FROM ...`.
    pub fn column(self, column: impl Into<String>) -> Self {
        self.assign(column, AssignmentOp::Clear)
    }

    pub fn assign(mut self, column: impl Into<String>, op: AssignmentOp) -> Self {
        self.assignments.push(Assignment {
            column: column.into(),
            op,
        });
        self
    }

    /// `USING TIMESTAMP`. Repeating it keeps the last value, as repeated
    /// `USING` options do.
    pub fn using_timestamp(mut self, timestamp: impl Into<i128>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// `USING TTL` in seconds. Repeating it keeps the last value.
    pub fn using_ttl(mut self, seconds: i64) -> Self {
        self.ttl = Some(seconds);
        self
    }

    pub fn is_row_delete(&self) -> bool {
        self.kind == StatementKind::Delete && self.assignments.is_empty()
    }
}
