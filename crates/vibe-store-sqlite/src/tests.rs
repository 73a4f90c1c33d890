//! Integration tests for `SqliteStore` against an in-memory database.

use serde_json::json;
use vibe_core::{
  session::{AuthError, Session, SessionStore},
  store::{Document, DocumentStore},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn doc(value: serde_json::Value) -> Document {
  match value {
    serde_json::Value::Object(map) => map,
    _ => panic!("test document must be an object"),
  }
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_missing_document_returns_none() {
  let s = store().await;
  let result = s.get_document("events", "nope").await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn set_then_get_round_trips() {
  let s = store().await;
  s.set_document("events", "Demo", doc(json!({ "title": "Demo" })), false)
    .await
    .unwrap();

  let fetched = s.get_document("events", "Demo").await.unwrap().unwrap();
  assert_eq!(fetched.get("title").unwrap(), "Demo");
}

#[tokio::test]
async fn set_without_merge_replaces_wholesale() {
  let s = store().await;
  s.set_document(
    "events",
    "Demo",
    doc(json!({ "title": "Demo", "location": "Hall" })),
    false,
  )
  .await
  .unwrap();
  s.set_document("events", "Demo", doc(json!({ "title": "Demo 2" })), false)
    .await
    .unwrap();

  let fetched = s.get_document("events", "Demo").await.unwrap().unwrap();
  assert_eq!(fetched.get("title").unwrap(), "Demo 2");
  assert!(fetched.get("location").is_none());
}

#[tokio::test]
async fn set_with_merge_preserves_absent_fields() {
  let s = store().await;
  s.set_document(
    "events",
    "Demo",
    doc(json!({ "title": "Demo", "location": "Hall" })),
    false,
  )
  .await
  .unwrap();
  s.set_document("events", "Demo", doc(json!({ "title": "Demo 2" })), true)
    .await
    .unwrap();

  let fetched = s.get_document("events", "Demo").await.unwrap().unwrap();
  assert_eq!(fetched.get("title").unwrap(), "Demo 2");
  assert_eq!(fetched.get("location").unwrap(), "Hall");
}

#[tokio::test]
async fn set_with_merge_creates_missing_document() {
  let s = store().await;
  s.set_document("events", "Fresh", doc(json!({ "title": "Fresh" })), true)
    .await
    .unwrap();
  assert!(s.get_document("events", "Fresh").await.unwrap().is_some());
}

#[tokio::test]
async fn scan_returns_all_documents_of_a_collection() {
  let s = store().await;
  s.set_document("events", "A", doc(json!({ "title": "A" })), false)
    .await
    .unwrap();
  s.set_document("events", "B", doc(json!({ "title": "B" })), false)
    .await
    .unwrap();
  s.set_document("profiles", "U1", doc(json!({ "community_name": "Acme" })), false)
    .await
    .unwrap();

  let events = s.scan_collection("events").await.unwrap();
  assert_eq!(events.len(), 2);

  let empty = s.scan_collection("nothing-here").await.unwrap();
  assert!(empty.is_empty());
}

// ─── Array union / removal ───────────────────────────────────────────────────

#[tokio::test]
async fn union_appends_and_is_idempotent() {
  let s = store().await;
  s.set_document("events", "Demo", doc(json!({ "title": "Demo" })), false)
    .await
    .unwrap();

  let like = json!({ "user_id": "U1" });
  s.union_array_field("events", "Demo", "likes", like.clone())
    .await
    .unwrap();
  s.union_array_field("events", "Demo", "likes", like.clone())
    .await
    .unwrap();

  let fetched = s.get_document("events", "Demo").await.unwrap().unwrap();
  assert_eq!(fetched.get("likes").unwrap(), &json!([like]));
}

#[tokio::test]
async fn remove_deletes_matching_entries_only() {
  let s = store().await;
  s.set_document(
    "events",
    "Demo",
    doc(json!({
      "title": "Demo",
      "likes": [{ "user_id": "U1" }, { "user_id": "U2" }],
    })),
    false,
  )
  .await
  .unwrap();

  s.remove_array_field("events", "Demo", "likes", json!({ "user_id": "U1" }))
    .await
    .unwrap();

  let fetched = s.get_document("events", "Demo").await.unwrap().unwrap();
  assert_eq!(fetched.get("likes").unwrap(), &json!([{ "user_id": "U2" }]));
}

#[tokio::test]
async fn remove_on_missing_field_yields_empty_array() {
  let s = store().await;
  s.set_document("events", "Demo", doc(json!({ "title": "Demo" })), false)
    .await
    .unwrap();

  s.remove_array_field("events", "Demo", "likes", json!({ "user_id": "U1" }))
    .await
    .unwrap();

  let fetched = s.get_document("events", "Demo").await.unwrap().unwrap();
  assert_eq!(fetched.get("likes").unwrap(), &json!([]));
}

#[tokio::test]
async fn union_on_missing_document_is_an_error() {
  let s = store().await;
  let err = s
    .union_array_field("events", "nope", "likes", json!({ "user_id": "U1" }))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DocumentNotFound { .. }));
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sign_up_then_sign_in() {
  let s = store().await;
  let created = s.sign_up("a@example.com", "hunter2").await.unwrap();
  let signed_in = s.sign_in("a@example.com", "hunter2").await.unwrap();
  assert_eq!(created, signed_in);
}

#[tokio::test]
async fn duplicate_sign_up_is_rejected() {
  let s = store().await;
  s.sign_up("a@example.com", "hunter2").await.unwrap();
  let err = s.sign_up("a@example.com", "other").await.unwrap_err();
  assert!(matches!(err, AuthError::AccountExists(_)));
}

#[tokio::test]
async fn wrong_password_is_invalid_credentials() {
  let s = store().await;
  s.sign_up("a@example.com", "hunter2").await.unwrap();
  let err = s.sign_in("a@example.com", "wrong").await.unwrap_err();
  assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn unknown_account_is_invalid_credentials() {
  let s = store().await;
  let err = s.authenticate("who@example.com", "pw").await.unwrap_err();
  assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn subscribers_see_session_transitions() {
  let s = store().await;
  let mut watch = s.subscribe();
  assert_eq!(*watch.borrow(), Session::Unknown);

  let principal = s.sign_up("a@example.com", "hunter2").await.unwrap();
  watch.changed().await.unwrap();
  assert_eq!(*watch.borrow(), Session::Authenticated(principal.clone()));

  s.sign_out();
  watch.changed().await.unwrap();
  assert_eq!(*watch.borrow(), Session::Anonymous);

  s.sign_in("a@example.com", "hunter2").await.unwrap();
  watch.changed().await.unwrap();
  assert_eq!(*watch.borrow(), Session::Authenticated(principal));
}

#[tokio::test]
async fn authenticate_does_not_publish() {
  let s = store().await;
  let watch = s.subscribe();
  s.sign_up("a@example.com", "hunter2").await.unwrap();

  let mut watch2 = watch.clone();
  watch2.mark_unchanged();
  s.authenticate("a@example.com", "hunter2").await.unwrap();
  assert!(!watch2.has_changed().unwrap());
}
