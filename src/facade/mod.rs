pub mod database;

pub use database::{Database, Session, TableStats};
