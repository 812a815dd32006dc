use super::{DataType, DbError, Result, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Role of a column in the primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    PartitionKey,
    Clustering,
    Regular,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            kind: ColumnKind::Regular,
        }
    }

    pub fn partition_key(mut self) -> Self {
        self.kind = ColumnKind::PartitionKey;
        self
    }

    pub fn clustering(mut self) -> Self {
        self.kind = ColumnKind::Clustering;
        self
    }

    pub fn is_key(&self) -> bool {
        self.kind != ColumnKind::Regular
    }

    /// Checks `value` against the column type and returns it in stored form.
    pub fn validate(&self, value: &Value) -> Result<Value> {
        if !self.data_type.is_compatible(value) {
            return Err(DbError::TypeMismatch(format!(
                "Column '{}' expects type {}, got {}",
                self.name,
                self.data_type,
                value.type_name()
            )));
        }
        Ok(self.data_type.coerce(value.clone()))
    }
}

/// Table definition: key layout, regular columns and the table-level TTL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    name: String,
    columns: Vec<Column>,
    default_ttl_seconds: Option<u64>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let name = name.into();
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(DbError::InvalidRequest(format!(
                    "Duplicate column '{}' in table '{}'",
                    column.name, name
                )));
            }
            if column.is_key() && column.data_type.is_collection() {
                return Err(DbError::InvalidRequest(format!(
                    "Key column '{}' cannot have collection type {}",
                    column.name, column.data_type
                )));
            }
        }
        if !columns.iter().any(|c| c.kind == ColumnKind::PartitionKey) {
            return Err(DbError::InvalidRequest(format!(
                "Table '{}' needs at least one partition key column",
                name
            )));
        }

        Ok(Self {
            name,
            columns,
            default_ttl_seconds: None,
        })
    }

    /// TTL applied to writes that do not carry their own. `0` disables it.
    pub fn with_default_ttl(mut self, seconds: u64) -> Self {
        self.default_ttl_seconds = (seconds > 0).then_some(seconds);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn default_ttl_seconds(&self) -> Option<u64> {
        self.default_ttl_seconds
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name == name)
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.get_column(name)
            .ok_or_else(|| DbError::ColumnNotFound(name.to_string(), self.name.clone()))
    }

    pub fn partition_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns_of(ColumnKind::PartitionKey)
    }

    pub fn clustering_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns_of(ColumnKind::Clustering)
    }

    pub fn regular_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns_of(ColumnKind::Regular)
    }

    fn columns_of(&self, kind: ColumnKind) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(move |c| c.kind == kind)
    }

    /// Builds the row identity from named key values. Every key column must be
    /// given exactly once and no other column may appear.
    pub fn row_key(&self, values: &[(String, Value)]) -> Result<RowKey> {
        for (name, _) in values {
            let column = self.column(name)?;
            if !column.is_key() {
                return Err(DbError::InvalidRequest(format!(
                    "Column '{}' is not part of the primary key of '{}'",
                    name, self.name
                )));
            }
        }

        let lookup = |column: &Column| -> Result<Value> {
            let mut matches = values.iter().filter(|(name, _)| *name == column.name);
            let (_, value) = matches.next().ok_or_else(|| {
                DbError::InvalidRequest(format!("Missing primary key column '{}'", column.name))
            })?;
            if matches.next().is_some() {
                return Err(DbError::InvalidRequest(format!(
                    "Primary key column '{}' given more than once",
                    column.name
                )));
            }
            if value.is_null() {
                return Err(DbError::InvalidRequest(format!(
                    "Primary key column '{}' cannot be NULL",
                    column.name
                )));
            }
            column.validate(value)
        };

        Ok(RowKey {
            partition: self.partition_columns().map(&lookup).collect::<Result<_>>()?,
            clustering: self.clustering_columns().map(&lookup).collect::<Result<_>>()?,
        })
    }

    /// Validates a partition-only prefix, in partition key order.
    pub fn partition_key(&self, values: &[(String, Value)]) -> Result<Vec<Value>> {
        self.partition_columns()
            .map(|column| {
                let (_, value) = values
                    .iter()
                    .find(|(name, _)| *name == column.name)
                    .ok_or_else(|| {
                        DbError::InvalidRequest(format!(
                            "Missing partition key column '{}'",
                            column.name
                        ))
                    })?;
                column.validate(value)
            })
            .collect()
    }
}

/// Immutable row identity: partition key values followed by clustering values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowKey {
    pub partition: Vec<Value>,
    pub clustering: Vec<Value>,
}

impl RowKey {
    pub fn new(partition: Vec<Value>, clustering: Vec<Value>) -> Self {
        Self {
            partition,
            clustering,
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.partition.iter().chain(self.clustering.iter()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> TableSchema {
        TableSchema::new(
            "t",
            vec![
                Column::new("k1", DataType::Integer).partition_key(),
                Column::new("k2", DataType::Integer).clustering(),
                Column::new("c", DataType::Integer),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_row_key_orders_by_schema() {
        let key = schema()
            .row_key(&[("k2".into(), Value::from(2)), ("k1".into(), Value::from(1))])
            .unwrap();
        assert_eq!(key.partition, vec![Value::from(1)]);
        assert_eq!(key.clustering, vec![Value::from(2)]);
        assert_eq!(key.to_string(), "(1, 2)");
    }

    #[test]
    fn test_row_key_rejects_missing_and_regular_columns() {
        let schema = schema();
        assert!(matches!(
            schema.row_key(&[("k1".into(), Value::from(1))]),
            Err(DbError::InvalidRequest(_))
        ));
        assert!(matches!(
            schema.row_key(&[
                ("k1".into(), Value::from(1)),
                ("k2".into(), Value::from(2)),
                ("c".into(), Value::from(3)),
            ]),
            Err(DbError::InvalidRequest(_))
        ));
        assert!(matches!(
            schema.row_key(&[("k1".into(), Value::Null), ("k2".into(), Value::from(2))]),
            Err(DbError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_float_key_written_as_integer_addresses_the_same_row() {
        let schema = TableSchema::new(
            "f",
            vec![
                Column::new("k", DataType::Float).partition_key(),
                Column::new("c", DataType::Float),
            ],
        )
        .unwrap();
        let from_integer = schema.row_key(&[("k".into(), Value::from(1))]).unwrap();
        let from_float = schema.row_key(&[("k".into(), Value::from(1.0))]).unwrap();
        assert_eq!(from_integer, from_float);
        assert_eq!(
            schema.partition_key(&[("k".into(), Value::from(1))]).unwrap(),
            vec![Value::Float(1.0)]
        );
        assert_eq!(
            schema.column("c").unwrap().validate(&Value::from(2)).unwrap(),
            Value::Float(2.0)
        );
    }

    #[test]
    fn test_schema_requires_partition_key() {
        let result = TableSchema::new("t", vec![Column::new("c", DataType::Integer)]);
        assert!(matches!(result, Err(DbError::InvalidRequest(_))));
    }

    #[test]
    fn test_zero_default_ttl_disables_expiry() {
        assert_eq!(schema().with_default_ttl(0).default_ttl_seconds(), None);
        assert_eq!(schema().with_default_ttl(30).default_ttl_seconds(), Some(30));
    }
}
