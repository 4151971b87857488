mod db;
mod errors;

pub use db::{MemoryDatabase, StoreOperation};
pub use errors::MemoryDatabaseError;
