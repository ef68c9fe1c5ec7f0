//! SQLite backend for the registration store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Status changes are conditional
//! `UPDATE`s, which makes every lifecycle transition a compare-and-swap.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
