// ============================================================================
// Mutation Processor
// ============================================================================
//
// Translates INSERT / UPDATE / DELETE into register merges:
//
//   INSERT  marker + listed columns, one stamp and one expiry for all of them
//   UPDATE  assigned columns only, the marker is never touched
//   DELETE  row: tombstone marker and every column; columns: named cells only
//
// Validation runs to completion before a timestamp is resolved, so a rejected
// statement leaves no trace in storage.
//
// ============================================================================

use super::request::{AssignmentOp, MutationRequest, StatementKind};
use crate::clock::{ResolvedTimestamp, TimestampResolver};
use crate::core::{DbError, Result, RowKey, TableSchema};
use crate::storage::{CellKey, Expiry, Payload, RowMutation, Version};
use std::collections::HashSet;

/// Cassandra's ceiling: 20 years.
pub const DEFAULT_MAX_TTL_SECONDS: u64 = 630_720_000;

/// A request that passed validation, with its key and payloads resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedMutation {
    pub kind: StatementKind,
    pub key: RowKey,
    pub timestamp: Option<i64>,
    pub ttl_seconds: Option<u64>,
    pub cells: Vec<(String, Payload)>,
}

#[derive(Debug, Clone)]
pub struct MutationProcessor {
    max_ttl_seconds: u64,
}

impl Default for MutationProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TTL_SECONDS)
    }
}

impl MutationProcessor {
    pub fn new(max_ttl_seconds: u64) -> Self {
        Self { max_ttl_seconds }
    }

    pub fn validate(
        &self,
        request: &MutationRequest,
        schema: &TableSchema,
    ) -> Result<ValidatedMutation> {
        let timestamp = request
            .timestamp
            .map(TimestampResolver::check_literal)
            .transpose()?;
        let ttl_seconds = self.effective_ttl(request, schema)?;
        let key = schema.row_key(&request.key)?;

        if request.kind == StatementKind::Update && request.assignments.is_empty() {
            return Err(DbError::InvalidRequest(
                "UPDATE must assign at least one column".into(),
            ));
        }

        let mut seen = HashSet::new();
        let mut cells = Vec::with_capacity(request.assignments.len());
        for assignment in &request.assignments {
            let column = schema.column(&assignment.column)?;
            if column.is_key() {
                return Err(DbError::InvalidRequest(format!(
                    "Primary key column '{}' cannot be assigned",
                    column.name
                )));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(DbError::InvalidRequest(format!(
                    "Column '{}' is set more than once",
                    column.name
                )));
            }

            let op = &assignment.op;
            check_op_allowed(request.kind, op, &column.name)?;

            if op.is_element_op() && !column.data_type.is_collection() {
                return Err(DbError::TypeMismatch(format!(
                    "Column '{}' of type {} does not support {}",
                    column.name,
                    column.data_type,
                    op.describe()
                )));
            }

            if timestamp.is_some() && column.data_type.is_collection() {
                let whole_value_write = match (request.kind, op) {
                    (StatementKind::Insert, AssignmentOp::Set(_)) => true,
                    (StatementKind::Delete, AssignmentOp::Clear) => true,
                    _ => false,
                };
                if !whole_value_write {
                    return Err(DbError::UnsupportedTimestampOnCollectionOp(
                        column.name.clone(),
                    ));
                }
            }

            let payload = match op {
                AssignmentOp::Set(value) => Payload::from_value(column.validate(value)?),
                AssignmentOp::Clear => Payload::Tombstone,
                other => {
                    return Err(DbError::UnsupportedOperation(format!(
                        "collection {} on column '{}'",
                        other.describe(),
                        column.name
                    )));
                }
            };
            cells.push((column.name.clone(), payload));
        }

        Ok(ValidatedMutation {
            kind: request.kind,
            key,
            timestamp,
            ttl_seconds,
            cells,
        })
    }

    /// Statement TTL, else the table default. Range-checked; `0` is kept and
    /// means "never expires".
    fn effective_ttl(&self, request: &MutationRequest, schema: &TableSchema) -> Result<Option<u64>> {
        match request.ttl {
            Some(_) if request.kind == StatementKind::Delete => Err(DbError::InvalidRequest(
                "DELETE does not accept USING TTL".into(),
            )),
            Some(ttl) if ttl < 0 => Err(DbError::InvalidTtl(format!(
                "{} is negative",
                ttl
            ))),
            Some(ttl) if (ttl as u64) > self.max_ttl_seconds => Err(DbError::InvalidTtl(format!(
                "{} exceeds the maximum of {} seconds",
                ttl, self.max_ttl_seconds
            ))),
            Some(ttl) => Ok(Some(ttl as u64)),
            None => Ok(schema.default_ttl_seconds()),
        }
    }

    /// Pure translation into register writes. Cannot fail.
    pub fn translate(
        &self,
        mutation: &ValidatedMutation,
        resolved: &ResolvedTimestamp,
    ) -> RowMutation {
        let stamp = resolved.stamp;
        let expiry = Expiry::after(resolved.issued_at, mutation.ttl_seconds);
        let mut row = RowMutation::new(mutation.key.clone());

        match mutation.kind {
            StatementKind::Insert => {
                row = row.write(
                    CellKey::LivenessMarker,
                    Version::new(Payload::Marker, stamp, expiry),
                );
            }
            StatementKind::Delete if mutation.cells.is_empty() => {
                return row.delete_row(stamp);
            }
            StatementKind::Update | StatementKind::Delete => {}
        }

        for (column, payload) in &mutation.cells {
            let version = match payload {
                Payload::Tombstone => Version::tombstone(stamp),
                _ => Version::new(payload.clone(), stamp, expiry),
            };
            row = row.write(CellKey::column(column.clone()), version);
        }

        row
    }
}

fn check_op_allowed(kind: StatementKind, op: &AssignmentOp, column: &str) -> Result<()> {
    let allowed = match kind {
        StatementKind::Insert => matches!(
            op,
            AssignmentOp::Set(_)
                | AssignmentOp::Append(_)
                | AssignmentOp::Prepend(_)
                | AssignmentOp::Remove(_)
        ),
        StatementKind::Update => !matches!(op, AssignmentOp::Clear | AssignmentOp::DeleteElement(_)),
        StatementKind::Delete => matches!(op, AssignmentOp::Clear | AssignmentOp::DeleteElement(_)),
    };
    if allowed {
        Ok(())
    } else {
        Err(DbError::InvalidRequest(format!(
            "{} cannot contain a {} on column '{}'",
            kind,
            op.describe(),
            column
        )))
    }
}
