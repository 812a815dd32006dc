//! Recommended imports grouped by abstraction level.
//!
//! `dx` covers everyday use through `Database` and `Session`.
//! `advanced` exposes the merge primitives for replica-style application.

pub mod dx {
    //! Stable high-level surface.
    pub use crate::{
        Column, DataType, Database, DbError, EngineConfig, MutationRequest, Projection,
        ReadRequest, ReadResult, Result, Session, TableSchema, Value,
    };
}

pub mod advanced {
    //! Register-level primitives: stamps, versions and direct table merges.
    pub use crate::clock::{
        Clock, ManualClock, ResolvedTimestamp, SystemClock, TimestampResolver, WriteStamp,
    };
    pub use crate::mutation::{MutationProcessor, ValidatedMutation};
    pub use crate::storage::{CellKey, Expiry, MergeStats, Payload, RowMutation, Table, Version};
}
