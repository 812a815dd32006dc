pub mod context;
pub mod delete;
pub mod dml;
pub mod executor;
pub mod query;
pub mod statement;
pub mod update;

pub use context::ExecutionContext;
pub use executor::{Executor, ExecutorPipeline};
pub use statement::Statement;
