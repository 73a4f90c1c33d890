//! Error types for `vibe-core`.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("an account already exists for {0}")]
  AccountExists(String),

  #[error("document not found: {collection}/{key}")]
  DocumentNotFound { collection: String, key: String },

  #[error("event ends ({ends_at}) before it starts ({starts_at})")]
  EndsBeforeStarts {
    starts_at: DateTime<Utc>,
    ends_at:   DateTime<Utc>,
  },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
