//! The [`DocumentStore`] trait — the contract with the external database.
//!
//! The store is schemaless: collections of JSON documents addressed by
//! string keys, with point reads, full scans, set/merge writes, and
//! field-level set-union/set-removal on array fields. Backends implement
//! this trait (e.g. `vibe-store-sqlite`); the workflow layer depends on the
//! abstraction, not on any concrete backend.

use std::future::Future;

use serde_json::{Map, Value};

/// A schemaless document: a JSON object.
pub type Document = Map<String, Value>;

/// Collection names used by the application.
pub mod collections {
  pub const EVENTS: &str = "events";
  pub const PROFILES: &str = "profiles";

  /// Path of the vestigial per-event `liked` placeholder sub-collection.
  pub fn event_liked(event_key: &str) -> String {
    format!("{EVENTS}/{event_key}/liked")
  }

  /// Path of the vestigial per-event `joined` placeholder sub-collection.
  pub fn event_joined(event_key: &str) -> String {
    format!("{EVENTS}/{event_key}/joined")
  }
}

/// Abstraction over the managed document database.
///
/// No method carries transaction or locking semantics: each call is a single
/// independent remote operation, and ordering across concurrent calls is
/// whatever the backend provides. All methods return `Send` futures so the
/// trait can be used from multi-threaded async runtimes.
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Point read. Returns `None` if the document does not exist.
  fn get_document<'a>(
    &'a self,
    collection: &'a str,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + 'a;

  /// Full scan of a collection, in the backend's iteration order.
  /// No sort is applied here or by any caller.
  fn scan_collection<'a>(
    &'a self,
    collection: &'a str,
  ) -> impl Future<Output = Result<Vec<(String, Document)>, Self::Error>> + Send + 'a;

  /// Write a document. With `merge = false` the document is replaced
  /// wholesale; with `merge = true` fields present in `fields` overwrite and
  /// absent fields are preserved (creating the document if needed).
  fn set_document<'a>(
    &'a self,
    collection: &'a str,
    key: &'a str,
    fields: Document,
    merge: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Add `value` to the array field `field` unless an equal element is
  /// already present (set-union semantics, structural equality). A missing
  /// field is treated as an empty array; a missing document is an error.
  fn union_array_field<'a>(
    &'a self,
    collection: &'a str,
    key: &'a str,
    field: &'a str,
    value: Value,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Remove every element equal to `value` from the array field `field`.
  /// A missing field is treated as an empty array; a missing document is an
  /// error.
  fn remove_array_field<'a>(
    &'a self,
    collection: &'a str,
    key: &'a str,
    field: &'a str,
    value: Value,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
