//! SQLite backend for the growlog plant journal.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Because that thread owns the only
//! connection, every store call is serialised; each multi-statement change
//! additionally runs inside its own transaction.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
