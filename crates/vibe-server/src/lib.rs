//! JSON HTTP surface for the Vibe event board.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`DocumentStore`] and [`SessionStore`]. TLS and deployment concerns are
//! the caller's responsibility.

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use vibe_core::{session::SessionStore, store::DocumentStore};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store: Arc<S>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: DocumentStore + SessionStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Accounts and sessions
    .route("/accounts", post(handlers::session::sign_up::<S>))
    .route("/session", post(handlers::session::sign_in::<S>))
    // Events
    .route(
      "/events",
      get(handlers::events::list::<S>).post(handlers::events::create::<S>),
    )
    .route(
      "/events/{key}",
      get(handlers::events::get_one::<S>)
        .patch(handlers::events::update::<S>),
    )
    .route("/events/{key}/like", post(handlers::events::toggle_like::<S>))
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────
