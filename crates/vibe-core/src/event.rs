//! Event types — the unit of content on the board.
//!
//! Events live in the document store's `events` collection. The structs here
//! are transient in-memory projections: fetched on view load, discarded on
//! navigation. The document store owns the data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Result, principal::Principal, store::Document};

/// Field names of a stored event document.
///
/// These (together with [`crate::store::collections`]) are the integration
/// contract with the document store; nothing else pins the layout.
pub mod fields {
  pub const TITLE: &str = "title";
  pub const LOCATION: &str = "location";
  pub const DETAILS: &str = "details";
  pub const DATE_STARTED: &str = "date_started";
  pub const DATE_ENDED: &str = "date_ended";
  pub const IMAGE: &str = "image";
  pub const USER_ID: &str = "user_id";
  pub const COMMUNITY_NAME: &str = "community_name";
  pub const DATE_CREATED: &str = "date_created";
  pub const LIKES: &str = "likes";
}

// ─── Like ────────────────────────────────────────────────────────────────────

/// Membership record in an event's like set.
///
/// One canonical field name — the membership check and the union/removal
/// updates must agree on it, or likes written by one can never be found by
/// the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
  pub user_id: Principal,
}

impl Like {
  pub fn by(principal: &Principal) -> Self {
    Self { user_id: principal.clone() }
  }

  /// The JSON value handed to the array union/removal primitives.
  pub fn to_value(&self) -> Value {
    serde_json::json!({ fields::USER_ID: self.user_id })
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// A projected event document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
  /// Document key within the `events` collection. This is the title at
  /// creation time; two events sharing a title collide on the same key.
  pub key:            String,
  pub title:          String,
  pub location:       String,
  pub details:        String,
  pub starts_at:      DateTime<Utc>,
  pub ends_at:        DateTime<Utc>,
  pub image:          Option<String>,
  /// The principal that created the event.
  pub owner:          Principal,
  pub community_name: String,
  pub created_at:     Option<DateTime<Utc>>,
  pub likes:          Vec<Like>,
}

/// Lenient wire shape: optional fields default instead of failing the read.
#[derive(Deserialize)]
struct EventDoc {
  title:          String,
  #[serde(default)]
  location:       String,
  #[serde(default)]
  details:        String,
  date_started:   DateTime<Utc>,
  date_ended:     DateTime<Utc>,
  #[serde(default)]
  image:          Option<String>,
  #[serde(default)]
  user_id:        Principal,
  #[serde(default)]
  community_name: String,
  #[serde(default)]
  date_created:   Option<DateTime<Utc>>,
  #[serde(default)]
  likes:          Vec<Like>,
}

impl Event {
  /// Project a stored document into an [`Event`].
  ///
  /// Fails only when the identifying fields (title, start/end timestamps)
  /// are missing or malformed; everything else defaults to empty/absent.
  pub fn from_document(key: &str, doc: &Document) -> Result<Self> {
    let doc: EventDoc =
      serde_json::from_value(Value::Object(doc.clone()))?;
    Ok(Self {
      key:            key.to_owned(),
      title:          doc.title,
      location:       doc.location,
      details:        doc.details,
      starts_at:      doc.date_started,
      ends_at:        doc.date_ended,
      image:          doc.image,
      owner:          doc.user_id,
      community_name: doc.community_name,
      created_at:     doc.date_created,
      likes:          doc.likes,
    })
  }

  /// Whether `principal` is a member of this event's like set.
  pub fn liked_by(&self, principal: &Principal) -> bool {
    self.likes.iter().any(|l| &l.user_id == principal)
  }
}

// ─── Draft and patch ─────────────────────────────────────────────────────────

/// Validated input for creating an event. The owning principal, community
/// name, and creation timestamp are attached by the composer.
#[derive(Debug, Clone)]
pub struct EventDraft {
  pub title:     String,
  pub location:  String,
  pub details:   String,
  pub starts_at: DateTime<Utc>,
  pub ends_at:   DateTime<Utc>,
  pub image:     Option<String>,
}

impl EventDraft {
  /// Reject drafts that end before they start, before anything is written.
  pub fn validate(&self) -> Result<()> {
    if self.ends_at < self.starts_at {
      return Err(crate::Error::EndsBeforeStarts {
        starts_at: self.starts_at,
        ends_at:   self.ends_at,
      });
    }
    Ok(())
  }

  /// Build the full stored document.
  pub fn into_document(
    self,
    owner: &Principal,
    community_name: &str,
    created_at: DateTime<Utc>,
  ) -> Document {
    let mut doc = Document::new();
    doc.insert(fields::TITLE.into(), Value::String(self.title));
    doc.insert(fields::LOCATION.into(), Value::String(self.location));
    doc.insert(fields::DETAILS.into(), Value::String(self.details));
    doc.insert(
      fields::DATE_STARTED.into(),
      Value::String(self.starts_at.to_rfc3339()),
    );
    doc.insert(
      fields::DATE_ENDED.into(),
      Value::String(self.ends_at.to_rfc3339()),
    );
    if let Some(image) = self.image {
      doc.insert(fields::IMAGE.into(), Value::String(image));
    }
    doc.insert(
      fields::USER_ID.into(),
      Value::String(owner.as_str().to_owned()),
    );
    doc.insert(
      fields::COMMUNITY_NAME.into(),
      Value::String(community_name.to_owned()),
    );
    doc.insert(
      fields::DATE_CREATED.into(),
      Value::String(created_at.to_rfc3339()),
    );
    doc
  }
}

/// Partial input for editing an event. Absent fields are preserved by the
/// merge-update; only present fields overwrite.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
  pub title:     Option<String>,
  pub location:  Option<String>,
  pub details:   Option<String>,
  pub starts_at: Option<DateTime<Utc>>,
  pub ends_at:   Option<DateTime<Utc>>,
  pub image:     Option<String>,
}

impl EventPatch {
  pub fn is_empty(&self) -> bool {
    self.title.is_none()
      && self.location.is_none()
      && self.details.is_none()
      && self.starts_at.is_none()
      && self.ends_at.is_none()
      && self.image.is_none()
  }

  /// Check start/end ordering when both ends of the range are in the patch.
  /// A one-sided patch is checked against the stored value by the composer.
  pub fn validate(&self) -> Result<()> {
    if let (Some(starts_at), Some(ends_at)) = (self.starts_at, self.ends_at)
      && ends_at < starts_at
    {
      return Err(crate::Error::EndsBeforeStarts { starts_at, ends_at });
    }
    Ok(())
  }

  /// Build the partial document handed to a merge-update.
  pub fn into_document(self) -> Document {
    let mut doc = Document::new();
    if let Some(title) = self.title {
      doc.insert(fields::TITLE.into(), Value::String(title));
    }
    if let Some(location) = self.location {
      doc.insert(fields::LOCATION.into(), Value::String(location));
    }
    if let Some(details) = self.details {
      doc.insert(fields::DETAILS.into(), Value::String(details));
    }
    if let Some(starts_at) = self.starts_at {
      doc.insert(
        fields::DATE_STARTED.into(),
        Value::String(starts_at.to_rfc3339()),
      );
    }
    if let Some(ends_at) = self.ends_at {
      doc.insert(
        fields::DATE_ENDED.into(),
        Value::String(ends_at.to_rfc3339()),
      );
    }
    if let Some(image) = self.image {
      doc.insert(fields::IMAGE.into(), Value::String(image));
    }
    doc
  }
}
