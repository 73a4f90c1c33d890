//! Like toggle — the membership flip on an event's like set.
//!
//! Shared by the feed and detail views. The toggle is not atomic with
//! respect to the read that produced `has_liked`: opposite-direction toggles
//! racing from a stale belief can land on either state. The union/removal
//! primitives are individually idempotent, so the set never holds a
//! duplicate entry either way. This race is accepted, not resolved here.

use vibe_core::{
  event::{Like, fields},
  principal::Principal,
  store::{DocumentStore, collections},
};

use crate::{Error, Result};

/// Flip `principal`'s membership in the like set of `events/{key}`.
///
/// `has_liked` is the caller's locally cached belief about current
/// membership: `true` issues a set-removal, `false` a set-union. Returns the
/// like record so the caller can mirror the change locally — only after this
/// acknowledgment, never before.
pub async fn toggle<D>(
  docs: &D,
  key: &str,
  principal: &Principal,
  has_liked: bool,
) -> Result<Like>
where
  D: DocumentStore,
{
  let like = Like::by(principal);
  if has_liked {
    docs
      .remove_array_field(collections::EVENTS, key, fields::LIKES, like.to_value())
      .await
      .map_err(Error::store)?;
  } else {
    docs
      .union_array_field(collections::EVENTS, key, fields::LIKES, like.to_value())
      .await
      .map_err(Error::store)?;
  }
  Ok(like)
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use vibe_core::store::{DocumentStore, collections};
  use vibe_store_sqlite::SqliteStore;

  use super::*;

  async fn store_with_event() -> SqliteStore {
    let s = SqliteStore::open_in_memory().await.unwrap();
    let doc = match json!({
      "title": "Demo",
      "date_started": "2025-01-01T00:00:00Z",
      "date_ended": "2025-01-02T00:00:00Z",
    }) {
      serde_json::Value::Object(map) => map,
      _ => unreachable!(),
    };
    s.set_document(collections::EVENTS, "Demo", doc, false)
      .await
      .unwrap();
    s
  }

  async fn likes(s: &SqliteStore) -> serde_json::Value {
    let doc = s
      .get_document(collections::EVENTS, "Demo")
      .await
      .unwrap()
      .unwrap();
    doc.get("likes").cloned().unwrap_or(json!([]))
  }

  #[tokio::test]
  async fn first_toggle_adds_a_like() {
    let s = store_with_event().await;
    let u1 = Principal::from("U1");

    toggle(&s, "Demo", &u1, false).await.unwrap();
    assert_eq!(likes(&s).await, json!([{ "user_id": "U1" }]));
  }

  #[tokio::test]
  async fn toggle_round_trip_restores_membership() {
    let s = store_with_event().await;
    let u1 = Principal::from("U1");

    toggle(&s, "Demo", &u1, false).await.unwrap();
    toggle(&s, "Demo", &u1, true).await.unwrap();
    assert_eq!(likes(&s).await, json!([]));
  }

  #[tokio::test]
  async fn stale_belief_union_stays_a_set() {
    // Two same-direction toggles from the same stale belief: the second
    // union is absorbed by set semantics.
    let s = store_with_event().await;
    let u1 = Principal::from("U1");

    toggle(&s, "Demo", &u1, false).await.unwrap();
    toggle(&s, "Demo", &u1, false).await.unwrap();
    assert_eq!(likes(&s).await, json!([{ "user_id": "U1" }]));
  }

  #[tokio::test]
  async fn likes_of_other_principals_are_untouched() {
    let s = store_with_event().await;
    let u1 = Principal::from("U1");
    let u2 = Principal::from("U2");

    toggle(&s, "Demo", &u1, false).await.unwrap();
    toggle(&s, "Demo", &u2, false).await.unwrap();
    toggle(&s, "Demo", &u1, true).await.unwrap();
    assert_eq!(likes(&s).await, json!([{ "user_id": "U2" }]));
  }

  #[tokio::test]
  async fn toggle_on_missing_event_is_a_store_error() {
    let s = SqliteStore::open_in_memory().await.unwrap();
    let u1 = Principal::from("U1");
    let err = toggle(&s, "nope", &u1, false).await.unwrap_err();
    assert!(matches!(err, Error::Store(_)));
  }
}
