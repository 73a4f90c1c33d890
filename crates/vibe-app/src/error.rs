//! Error type for the workflow layer.
//!
//! Backend errors are boxed: the views are generic over the store traits and
//! only ever report, never inspect, what the backend failed with.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] vibe_core::Error),

  #[error("event not found: {0}")]
  EventNotFound(String),

  #[error("not signed in")]
  NotSignedIn,

  #[error("no event loaded")]
  NotLoaded,

  #[error("session store closed")]
  SessionClosed,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store(
    e: impl std::error::Error + Send + Sync + 'static,
  ) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
