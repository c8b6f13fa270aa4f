//! SQLite backend for the Driftline catalog.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Rebuilds run synchronously on that
//! thread inside one SQLite transaction (see [`SqliteSession`]).

mod encode;
mod schema;
mod session;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use session::{SqliteRebuild, SqliteSession};
pub use store::SqliteStore;
