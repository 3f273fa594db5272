//! # Storage Module
//!
//! The boundary to the remote store: raw row shapes, the storage traits
//! the rest of the system depends on, and the sqlite implementation.

pub mod rows;
pub mod sqlite;
#[cfg(test)]
pub mod test_utils;
pub mod traits;

pub use rows::{DailyRecordRow, ExpenseRow, FixedCostRow, ProfileRow};
pub use sqlite::{DbConnection, SqliteStore};
pub use traits::{DailyRecordStorage, FixedCostStorage, ProfileStorage, RemoteStore};
