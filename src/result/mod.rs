mod result;

pub use result::{MutationOutcome, Projection, QueryResult, ReadResult, RowResult};
