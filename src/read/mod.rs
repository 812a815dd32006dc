pub mod projector;
pub mod request;

pub use projector::ReadProjector;
pub use request::{ReadRequest, RowSelector};
