//! Event composer — create and edit flows.
//!
//! Creation stamps the draft with the owning principal, the community name
//! resolved from the principal's profile, and a creation timestamp, then
//! writes the document keyed by title. Editing is a merge-update: fields in
//! the submission overwrite, absent fields are preserved.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};
use vibe_core::{
  event::{Event, EventDraft, EventPatch},
  principal::Principal,
  profile::Profile,
  session::SessionWatch,
  store::{DocumentStore, collections},
};

use crate::{Error, Result};

pub struct Composer<D> {
  docs:    Arc<D>,
  session: SessionWatch,
}

impl<D: DocumentStore> Composer<D> {
  pub fn new(docs: Arc<D>, session: SessionWatch) -> Self {
    Self { docs, session }
  }

  fn current_principal(&self) -> Result<Principal> {
    self
      .session
      .borrow()
      .principal()
      .cloned()
      .ok_or(Error::NotSignedIn)
  }

  /// Resolve the principal's community name via a point read on the
  /// profiles collection. A missing profile resolves to an empty name.
  async fn resolve_community(&self, principal: &Principal) -> Result<String> {
    let doc = self
      .docs
      .get_document(collections::PROFILES, principal.as_str())
      .await
      .map_err(Error::store)?;
    match doc {
      Some(doc) => Ok(Profile::from_document(&doc)?.community_name),
      None => {
        tracing::warn!(principal = %principal, "no profile document found");
        Ok(String::new())
      }
    }
  }

  /// Create a new event from a validated draft. Returns the document key.
  ///
  /// Events are keyed by title; two events sharing a title collide on the
  /// same key. The two placeholder sub-documents are written after the
  /// event, not transactionally with it — a failure in between leaves the
  /// event in place.
  pub async fn create(&self, draft: EventDraft) -> Result<String> {
    let principal = self.current_principal()?;
    draft.validate()?;

    let community = self.resolve_community(&principal).await?;
    let key       = draft.title.clone();
    let doc       = draft.into_document(&principal, &community, Utc::now());

    self
      .docs
      .set_document(collections::EVENTS, &key, doc, false)
      .await
      .map_err(Error::store)?;

    let placeholder = match json!({ "user_ids": [] }) {
      Value::Object(map) => map,
      _ => unreachable!("placeholder is an object"),
    };
    self
      .docs
      .set_document(
        &collections::event_liked(&key),
        "initial",
        placeholder.clone(),
        false,
      )
      .await
      .map_err(Error::store)?;
    self
      .docs
      .set_document(
        &collections::event_joined(&key),
        "initial",
        placeholder,
        false,
      )
      .await
      .map_err(Error::store)?;

    Ok(key)
  }

  /// Load current field values to pre-populate the edit form.
  pub async fn load_for_edit(&self, key: &str) -> Result<Event> {
    let doc = self
      .docs
      .get_document(collections::EVENTS, key)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::EventNotFound(key.to_owned()))?;
    Ok(Event::from_document(key, &doc)?)
  }

  /// Merge-update an existing event. The effective start/end range (patched
  /// fields overlaid on stored values) must stay ordered.
  pub async fn edit(&self, key: &str, patch: EventPatch) -> Result<()> {
    self.current_principal()?;

    let stored = self.load_for_edit(key).await?;
    let starts_at = patch.starts_at.unwrap_or(stored.starts_at);
    let ends_at   = patch.ends_at.unwrap_or(stored.ends_at);
    if ends_at < starts_at {
      return Err(
        vibe_core::Error::EndsBeforeStarts { starts_at, ends_at }.into(),
      );
    }

    if patch.is_empty() {
      return Ok(());
    }

    self
      .docs
      .set_document(collections::EVENTS, key, patch.into_document(), true)
      .await
      .map_err(Error::store)?;
    Ok(())
  }
}
