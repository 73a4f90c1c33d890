//! Event feed — loads all events and dispatches like-toggle intents.
//!
//! The feed holds a transient projection of the `events` collection,
//! refreshed by [`Feed::load`] on navigation. Between loads the like state
//! is an optimistic local mirror of acknowledged updates; concurrent likers
//! only become visible on the next load.

use std::sync::Arc;

use vibe_core::{
  event::Event,
  session::SessionWatch,
  store::{DocumentStore, collections},
};

use crate::{Error, Result, like};

pub struct Feed<D> {
  docs:    Arc<D>,
  session: SessionWatch,
  events:  Vec<Event>,
}

impl<D: DocumentStore> Feed<D> {
  pub fn new(docs: Arc<D>, session: SessionWatch) -> Self {
    Self { docs, session, events: Vec::new() }
  }

  /// Load the feed: a full scan of the events collection, kept in the
  /// store's iteration order (no sort is applied). A failed scan is logged
  /// and yields an empty feed; documents that fail to project are skipped.
  pub async fn load(&mut self) {
    let rows = match self.docs.scan_collection(collections::EVENTS).await {
      Ok(rows) => rows,
      Err(e) => {
        tracing::warn!(error = %e, "event scan failed; showing empty feed");
        self.events.clear();
        return;
      }
    };

    self.events = rows
      .into_iter()
      .filter_map(|(key, doc)| match Event::from_document(&key, &doc) {
        Ok(event) => Some(event),
        Err(e) => {
          tracing::warn!(key = %key, error = %e, "skipping malformed event");
          None
        }
      })
      .collect();
  }

  pub fn events(&self) -> &[Event] {
    &self.events
  }

  /// Whether the signed-in principal has liked `key`, per the local cache.
  /// Anonymous viewers have liked nothing.
  pub fn has_liked(&self, key: &str) -> bool {
    let Some(principal) = self.session.borrow().principal().cloned() else {
      return false;
    };
    self
      .events
      .iter()
      .find(|e| e.key == key)
      .is_some_and(|e| e.liked_by(&principal))
  }

  /// Dispatch a like toggle for the signed-in principal.
  ///
  /// An absent principal is a no-op, not an error. The local mirror flips
  /// only after the store acknowledges the update; on failure the mirror is
  /// left unchanged and the error is logged and returned.
  pub async fn toggle_like(&mut self, key: &str) -> Result<()> {
    let principal = self.session.borrow().principal().cloned();
    let Some(principal) = principal else { return Ok(()) };

    let Some(event) = self.events.iter_mut().find(|e| e.key == key) else {
      return Err(Error::EventNotFound(key.to_owned()));
    };
    let has_liked = event.liked_by(&principal);

    match like::toggle(&*self.docs, key, &principal, has_liked).await {
      Ok(like) => {
        if has_liked {
          event.likes.retain(|l| l.user_id != principal);
        } else {
          event.likes.push(like);
        }
        Ok(())
      }
      Err(e) => {
        tracing::warn!(key = %key, error = %e, "like toggle failed");
        Err(e)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use tokio::sync::watch;
  use vibe_core::session::Session;
  use vibe_store_sqlite::SqliteStore;

  use super::*;

  fn obj(value: serde_json::Value) -> vibe_core::store::Document {
    match value {
      serde_json::Value::Object(map) => map,
      _ => panic!("expected an object"),
    }
  }

  async fn seeded_store() -> SqliteStore {
    let s = SqliteStore::open_in_memory().await.unwrap();
    s.set_document(
      "events",
      "Demo",
      obj(json!({
        "title": "Demo",
        "location": "Hall",
        "details": "A demo event",
        "date_started": "2025-01-01T00:00:00Z",
        "date_ended": "2025-01-02T00:00:00Z",
      })),
      false,
    )
    .await
    .unwrap();
    s
  }

  fn session(state: Session) -> SessionWatch {
    // A receiver keeps serving the last value after the sender is dropped.
    watch::Sender::new(state).subscribe()
  }

  #[tokio::test]
  async fn load_projects_all_events() {
    let s = seeded_store().await;
    let mut feed = Feed::new(Arc::new(s), session(Session::Anonymous));
    feed.load().await;
    assert_eq!(feed.events().len(), 1);
    assert_eq!(feed.events()[0].title, "Demo");
  }

  #[tokio::test]
  async fn load_skips_malformed_documents() {
    let s = seeded_store().await;
    s.set_document("events", "broken", obj(json!({ "title": "No dates" })), false)
      .await
      .unwrap();

    let mut feed = Feed::new(Arc::new(s), session(Session::Anonymous));
    feed.load().await;
    assert_eq!(feed.events().len(), 1);
  }

  #[tokio::test]
  async fn toggle_like_counts_up_then_back_down() {
    let s = seeded_store().await;
    let mut feed = Feed::new(
      Arc::new(s),
      session(Session::Authenticated("U1".into())),
    );
    feed.load().await;
    assert!(!feed.has_liked("Demo"));

    feed.toggle_like("Demo").await.unwrap();
    assert!(feed.has_liked("Demo"));
    assert_eq!(feed.events()[0].likes.len(), 1);

    feed.toggle_like("Demo").await.unwrap();
    assert!(!feed.has_liked("Demo"));
    assert_eq!(feed.events()[0].likes.len(), 0);
  }

  #[tokio::test]
  async fn anonymous_toggle_is_a_noop() {
    let s = seeded_store().await;
    let mut feed = Feed::new(Arc::new(s.clone()), session(Session::Anonymous));
    feed.load().await;

    feed.toggle_like("Demo").await.unwrap();
    assert_eq!(feed.events()[0].likes.len(), 0);

    let stored = s.get_document("events", "Demo").await.unwrap().unwrap();
    assert!(stored.get("likes").is_none());
  }

  #[tokio::test]
  async fn toggle_on_unknown_key_is_not_found() {
    let s = seeded_store().await;
    let mut feed = Feed::new(
      Arc::new(s),
      session(Session::Authenticated("U1".into())),
    );
    feed.load().await;

    let err = feed.toggle_like("nope").await.unwrap_err();
    assert!(matches!(err, Error::EventNotFound(_)));
  }

  #[tokio::test]
  async fn local_mirror_survives_until_next_load() {
    let s = seeded_store().await;
    let mut feed = Feed::new(
      Arc::new(s),
      session(Session::Authenticated("U1".into())),
    );
    feed.load().await;
    feed.toggle_like("Demo").await.unwrap();

    // Re-fetch on navigation reconciles the mirror with the store.
    feed.load().await;
    assert!(feed.has_liked("Demo"));
  }
}
