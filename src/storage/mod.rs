pub mod catalog;
pub mod cell;
pub mod liveness;
pub mod memory;
pub mod row;
pub mod table;

pub use catalog::Catalog;
pub use cell::{CellKey, Expiry, MergeOutcome, Payload, Version};
pub use memory::InMemoryStorage;
pub use row::RowCells;
pub use table::{MergeStats, RowMutation, Table};
