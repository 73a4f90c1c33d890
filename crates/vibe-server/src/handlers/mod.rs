//! JSON endpoint handlers.

pub mod events;
pub mod session;
