//! Event detail — one event, loaded by key, with its like toggle.

use std::sync::Arc;

use vibe_core::{
  event::Event,
  session::SessionWatch,
  store::{DocumentStore, collections},
};

use crate::{Error, Result, like};

pub struct Detail<D> {
  docs:      Arc<D>,
  session:   SessionWatch,
  event:     Option<Event>,
  /// Locally cached belief about the signed-in principal's membership in
  /// the like set, derived at load time and mirrored after each toggle.
  has_liked: bool,
}

impl<D: DocumentStore> Detail<D> {
  pub fn new(docs: Arc<D>, session: SessionWatch) -> Self {
    Self { docs, session, event: None, has_liked: false }
  }

  /// Point read of `events/{key}`. An unknown key surfaces
  /// [`Error::EventNotFound`]; the caller redirects to the feed.
  pub async fn load(&mut self, key: &str) -> Result<&Event> {
    let doc = self
      .docs
      .get_document(collections::EVENTS, key)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::EventNotFound(key.to_owned()))?;

    let event = Event::from_document(key, &doc)?;
    self.has_liked = match self.session.borrow().principal() {
      Some(principal) => event.liked_by(principal),
      None => false,
    };
    Ok(&*self.event.insert(event))
  }

  pub fn event(&self) -> Option<&Event> {
    self.event.as_ref()
  }

  pub fn has_liked(&self) -> bool {
    self.has_liked
  }

  /// Toggle the signed-in principal's like on the loaded event.
  ///
  /// An absent principal is a no-op. The `has_liked` belief and the cached
  /// like collection flip only after the store acknowledges; a failed update
  /// leaves both unchanged.
  pub async fn toggle_like(&mut self) -> Result<()> {
    let principal = self.session.borrow().principal().cloned();
    let Some(principal) = principal else { return Ok(()) };
    let Some(event) = self.event.as_mut() else {
      return Err(Error::NotLoaded);
    };

    match like::toggle(&*self.docs, &event.key, &principal, self.has_liked)
      .await
    {
      Ok(like) => {
        if self.has_liked {
          event.likes.retain(|l| l.user_id != principal);
        } else {
          event.likes.push(like);
        }
        self.has_liked = !self.has_liked;
        Ok(())
      }
      Err(e) => {
        tracing::warn!(key = %event.key, error = %e, "like toggle failed");
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

  fn session(state: Session) -> SessionWatch {
    watch::Sender::new(state).subscribe()
  }

  async fn seeded_store() -> SqliteStore {
    let s = SqliteStore::open_in_memory().await.unwrap();
    s.set_document(
      "events",
      "Demo",
      obj(json!({
        "title": "Demo",
        "date_started": "2025-01-01T00:00:00Z",
        "date_ended": "2025-01-02T00:00:00Z",
        "likes": [{ "user_id": "U2" }],
      })),
      false,
    )
    .await
    .unwrap();
    s
  }

  #[tokio::test]
  async fn load_derives_has_liked_from_membership() {
    let s = seeded_store().await;

    let mut mine = Detail::new(
      Arc::new(s.clone()),
      session(Session::Authenticated("U2".into())),
    );
    mine.load("Demo").await.unwrap();
    assert!(mine.has_liked());

    let mut theirs = Detail::new(
      Arc::new(s),
      session(Session::Authenticated("U1".into())),
    );
    theirs.load("Demo").await.unwrap();
    assert!(!theirs.has_liked());
  }

  #[tokio::test]
  async fn load_unknown_key_is_not_found() {
    let s = SqliteStore::open_in_memory().await.unwrap();
    let mut detail = Detail::new(Arc::new(s), session(Session::Anonymous));
    let err = detail.load("nope").await.unwrap_err();
    assert!(matches!(err, Error::EventNotFound(_)));
  }

  #[tokio::test]
  async fn toggle_flips_belief_and_mirror_after_ack() {
    let s = seeded_store().await;
    let mut detail = Detail::new(
      Arc::new(s.clone()),
      session(Session::Authenticated("U1".into())),
    );
    detail.load("Demo").await.unwrap();

    detail.toggle_like().await.unwrap();
    assert!(detail.has_liked());
    assert_eq!(detail.event().unwrap().likes.len(), 2);

    let stored = s.get_document("events", "Demo").await.unwrap().unwrap();
    assert_eq!(
      stored.get("likes").unwrap(),
      &json!([{ "user_id": "U2" }, { "user_id": "U1" }])
    );

    detail.toggle_like().await.unwrap();
    assert!(!detail.has_liked());
    assert_eq!(detail.event().unwrap().likes.len(), 1);
  }

  #[tokio::test]
  async fn anonymous_toggle_is_a_noop() {
    let s = seeded_store().await;
    let mut detail =
      Detail::new(Arc::new(s.clone()), session(Session::Anonymous));
    detail.load("Demo").await.unwrap();

    detail.toggle_like().await.unwrap();
    assert!(!detail.has_liked());
    assert_eq!(detail.event().unwrap().likes.len(), 1);
  }
}
