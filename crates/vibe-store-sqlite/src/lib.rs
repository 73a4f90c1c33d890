//! SQLite backend for the Vibe document and session stores.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. One [`SqliteStore`] implements
//! both [`vibe_core::store::DocumentStore`] and
//! [`vibe_core::session::SessionStore`].

mod schema;
mod sessions;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
