//! Principal — an authenticated identity issued by the session store.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for an authenticated account.
///
/// Issued at sign-up and carried on every owned document. The application
/// never inspects its contents; it only compares principals for equality.
#[derive(
  Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Principal(pub String);

impl Principal {
  /// Mint a fresh identifier for a new account.
  pub fn generate() -> Self {
    Self(Uuid::new_v4().hyphenated().to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Principal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for Principal {
  fn from(s: &str) -> Self {
    Self(s.to_owned())
  }
}

impl From<String> for Principal {
  fn from(s: String) -> Self {
    Self(s)
  }
}
