pub mod processor;
pub mod request;

pub use processor::{DEFAULT_MAX_TTL_SECONDS, MutationProcessor, ValidatedMutation};
pub use request::{Assignment, AssignmentOp, MutationRequest, StatementKind};
