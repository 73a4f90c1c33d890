//! Handlers for `/events` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/events` | Feed, with per-caller `has_liked` |
//! | `POST`  | `/events` | Composer create; 422 on an inverted range |
//! | `GET`   | `/events/:key` | 404 if not found |
//! | `PATCH` | `/events/:key` | Merge-update; absent fields preserved |
//! | `POST`  | `/events/:key/like` | Body: `{"has_liked":bool}` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use vibe_app::{composer::Composer, detail::Detail, feed::Feed, like};
use vibe_core::{
  event::{Event, EventDraft, EventPatch},
  session::{Session, SessionStore},
  store::DocumentStore,
};

use crate::{AppState, auth::Authenticated, error::ApiError};

/// An event plus the requesting principal's membership in its like set.
#[derive(Debug, Serialize)]
pub struct EventView {
  #[serde(flatten)]
  pub event:     Event,
  pub has_liked: bool,
}

// ─── Feed ────────────────────────────────────────────────────────────────────

/// `GET /events`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Authenticated(principal): Authenticated,
) -> Result<Json<Vec<EventView>>, ApiError>
where
  S: DocumentStore + SessionStore + Clone + Send + Sync + 'static,
{
  let mut feed = Feed::new(
    state.store.clone(),
    Session::Authenticated(principal).into_watch(),
  );
  feed.load().await;

  let items = feed
    .events()
    .iter()
    .map(|event| EventView {
      has_liked: feed.has_liked(&event.key),
      event:     event.clone(),
    })
    .collect();
  Ok(Json(items))
}

// ─── Detail ──────────────────────────────────────────────────────────────────

/// `GET /events/:key`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Authenticated(principal): Authenticated,
  Path(key): Path<String>,
) -> Result<Json<EventView>, ApiError>
where
  S: DocumentStore + SessionStore + Clone + Send + Sync + 'static,
{
  let mut detail = Detail::new(
    state.store.clone(),
    Session::Authenticated(principal).into_watch(),
  );
  let event = detail.load(&key).await?.clone();
  Ok(Json(EventView { has_liked: detail.has_liked(), event }))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub title:     String,
  pub location:  String,
  pub details:   String,
  pub starts_at: DateTime<Utc>,
  pub ends_at:   DateTime<Utc>,
  pub image:     Option<String>,
}

/// `POST /events`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Authenticated(principal): Authenticated,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore + SessionStore + Clone + Send + Sync + 'static,
{
  let composer = Composer::new(
    state.store.clone(),
    Session::Authenticated(principal).into_watch(),
  );
  let draft = EventDraft {
    title:     body.title,
    location:  body.location,
    details:   body.details,
    starts_at: body.starts_at,
    ends_at:   body.ends_at,
    image:     body.image,
  };
  let key = composer.create(draft).await?;
  Ok((StatusCode::CREATED, Json(json!({ "key": key }))))
}

// ─── Edit ────────────────────────────────────────────────────────────────────

/// `PATCH /events/:key`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Authenticated(principal): Authenticated,
  Path(key): Path<String>,
  Json(patch): Json<EventPatch>,
) -> Result<StatusCode, ApiError>
where
  S: DocumentStore + SessionStore + Clone + Send + Sync + 'static,
{
  let composer = Composer::new(
    state.store.clone(),
    Session::Authenticated(principal).into_watch(),
  );
  composer.edit(&key, patch).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Like toggle ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LikeBody {
  /// The caller's locally cached belief about current membership.
  pub has_liked: bool,
}

/// `POST /events/:key/like`
pub async fn toggle_like<S>(
  State(state): State<AppState<S>>,
  Authenticated(principal): Authenticated,
  Path(key): Path<String>,
  Json(body): Json<LikeBody>,
) -> Result<StatusCode, ApiError>
where
  S: DocumentStore + SessionStore + Clone + Send + Sync + 'static,
{
  // Surface a clean 404 before dispatching the array update.
  let mut detail = Detail::new(
    state.store.clone(),
    Session::Authenticated(principal.clone()).into_watch(),
  );
  detail.load(&key).await?;

  like::toggle(&*state.store, &key, &principal, body.has_liked).await?;
  Ok(StatusCode::NO_CONTENT)
}
