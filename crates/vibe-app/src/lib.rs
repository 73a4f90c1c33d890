//! Workflow layer for the Vibe event board.
//!
//! The views here are headless: they hold transient in-memory projections of
//! document-store state plus the logic that the UI dispatches into — loading
//! the feed, toggling likes, composing events, and gating on the session.
//! Store handles are injected at construction; nothing here reaches for a
//! global.

pub mod composer;
pub mod detail;
pub mod error;
pub mod feed;
pub mod guard;
pub mod like;

pub use error::{Error, Result};
