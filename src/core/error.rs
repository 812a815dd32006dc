use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DbError {
    #[error("Invalid timestamp: {0} is reserved")]
    InvalidTimestamp(i64),

    #[error("Timestamp out of range: {0} does not fit in a signed 64-bit integer")]
    TimestampOutOfRange(i128),

    #[error("USING TIMESTAMP is not supported for collection operation on column '{0}'")]
    UnsupportedTimestampOnCollectionOp(String),

    #[error("No value for column '{0}'")]
    NoValue(String),

    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Table '{0}' already exists")]
    TableExists(String),

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("Column '{0}' not found in table '{1}'")]
    ColumnNotFound(String, String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
