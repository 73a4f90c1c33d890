//! Profile — per-principal metadata in the `profiles` collection.
//!
//! Read-only from the application's point of view: the composer resolves the
//! community name from here when stamping a new event.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Result, store::Document};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
  #[serde(default)]
  pub community_name: String,
  #[serde(default)]
  pub display_name:   String,
}

impl Profile {
  pub fn from_document(doc: &Document) -> Result<Self> {
    Ok(serde_json::from_value(Value::Object(doc.clone()))?)
  }

  /// Used when seeding profiles; the components here never write one back.
  pub fn to_document(&self) -> Result<Document> {
    match serde_json::to_value(self)? {
      Value::Object(map) => Ok(map),
      _ => unreachable!("Profile serialises to an object"),
    }
  }
}
