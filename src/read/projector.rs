use super::request::ReadRequest;
use crate::core::{Column, ColumnKind, DbError, Result, RowKey, TableSchema, Value};
use crate::result::{Projection, RowResult};
use crate::storage::RowCells;
use std::collections::BTreeMap;

/// Turns stored cells into what a reader sees at one fixed read time.
///
/// Column names are checked once up front so that every row of a scan is
/// evaluated against the same validated projection.
#[derive(Debug)]
pub struct ReadProjector<'a> {
    schema: &'a TableSchema,
    columns: Vec<&'a Column>,
    writetime_columns: Vec<&'a Column>,
    ttl_columns: Vec<&'a Column>,
    read_time: i64,
}

impl<'a> ReadProjector<'a> {
    pub fn new(schema: &'a TableSchema, request: &ReadRequest, read_time: i64) -> Result<Self> {
        let columns = if request.columns.is_empty() {
            schema.columns().iter().collect()
        } else {
            request
                .columns
                .iter()
                .map(|name| schema.column(name))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(Self {
            schema,
            columns,
            writetime_columns: Self::introspected(schema, &request.writetime_columns, "writetime")?,
            ttl_columns: Self::introspected(schema, &request.ttl_columns, "ttl")?,
            read_time,
        })
    }

    fn introspected(
        schema: &'a TableSchema,
        names: &[String],
        function: &str,
    ) -> Result<Vec<&'a Column>> {
        names
            .iter()
            .map(|name| {
                let column = schema.column(name)?;
                if column.is_key() {
                    return Err(DbError::InvalidRequest(format!(
                        "Cannot use selection function {}() on PRIMARY KEY part '{}'",
                        function, name
                    )));
                }
                Ok(column)
            })
            .collect()
    }

    pub fn read_time(&self) -> i64 {
        self.read_time
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn project(&self, key: &RowKey, cells: Option<&RowCells>) -> Result<Projection> {
        let Some(cells) = cells.filter(|cells| cells.exists_at(self.read_time)) else {
            return Ok(Projection::Absent);
        };

        let values = self
            .columns
            .iter()
            .map(|column| {
                let value = match column.kind {
                    ColumnKind::Regular => cells
                        .value_at(&column.name, self.read_time)
                        .cloned()
                        .unwrap_or(Value::Null),
                    _ => self.key_value(key, column),
                };
                (column.name.clone(), value)
            })
            .collect();

        let mut writetimes = BTreeMap::new();
        for column in &self.writetime_columns {
            let visible = cells
                .column(&column.name)
                .filter(|version| version.value_at(self.read_time).is_some())
                .ok_or_else(|| DbError::NoValue(column.name.clone()))?;
            writetimes.insert(column.name.clone(), visible.stamp.write_time());
        }

        let ttls = self
            .ttl_columns
            .iter()
            .map(|column| {
                let remaining = cells
                    .column(&column.name)
                    .filter(|version| version.value_at(self.read_time).is_some())
                    .and_then(|version| version.expiry.remaining_seconds(self.read_time));
                (column.name.clone(), remaining)
            })
            .collect();

        Ok(Projection::Row(RowResult {
            key: key.clone(),
            values,
            writetimes,
            ttls,
        }))
    }

    fn key_value(&self, key: &RowKey, column: &Column) -> Value {
        let components = match column.kind {
            ColumnKind::PartitionKey => &key.partition,
            _ => &key.clustering,
        };
        self.schema
            .columns()
            .iter()
            .filter(|c| c.kind == column.kind)
            .position(|c| c.name == column.name)
            .and_then(|i| components.get(i))
            .cloned()
            .unwrap_or(Value::Null)
    }
}
