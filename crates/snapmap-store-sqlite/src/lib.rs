//! SQLite backend for the snapmap record store.
//!
//! Every operation opens its own [`tokio_rusqlite`] connection against the
//! database file, runs, and closes it again, so no handle outlives the call
//! that needed it.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
