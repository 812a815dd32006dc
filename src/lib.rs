// ============================================================================
// RustCellDB Library
// ============================================================================
//
// Per-cell last-write-wins conflict resolution with TTL expiration and row
// liveness, for a wide-column store. Every statement is validated, stamped
// and merged cell by cell; reads evaluate visibility at one read time.
//
// ============================================================================

pub mod clock;
pub mod config;
pub mod core;
pub mod executor;
pub mod facade;
pub mod mutation;
pub mod prelude;
pub mod read;
pub mod result;
pub mod storage;

// Re-export main types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use core::{Column, ColumnKind, DataType, DbError, Result, RowKey, TableSchema, Value};
pub use executor::Statement;
pub use facade::{Database, Session, TableStats};
pub use mutation::{AssignmentOp, MutationRequest, StatementKind};
pub use read::{ReadRequest, RowSelector};
pub use result::{MutationOutcome, Projection, QueryResult, ReadResult, RowResult};
