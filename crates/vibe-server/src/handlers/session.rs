//! Handlers for account and session endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/accounts` | Body: `{"email":..,"password":..}`; 409 if taken |
//! | `POST` | `/session`  | Same body; 401 on bad credentials |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use vibe_core::{
  session::{AuthError, SessionStore},
  store::DocumentStore,
};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct Credentials {
  pub email:    String,
  pub password: String,
}

fn auth_error<E>(e: AuthError<E>) -> ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  match e {
    AuthError::InvalidCredentials => ApiError::Unauthorized,
    AuthError::AccountExists(email) => {
      ApiError::Conflict(format!("an account already exists for {email}"))
    }
    AuthError::Backend(e) => ApiError::store(e),
  }
}

/// `POST /accounts` — sign up; the new account is signed in.
pub async fn sign_up<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore + SessionStore + Clone + Send + Sync + 'static,
{
  let principal = state
    .store
    .sign_up(&body.email, &body.password)
    .await
    .map_err(auth_error)?;
  Ok((StatusCode::CREATED, Json(json!({ "principal": principal }))))
}

/// `POST /session` — sign in.
pub async fn sign_in<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DocumentStore + SessionStore + Clone + Send + Sync + 'static,
{
  let principal = state
    .store
    .sign_in(&body.email, &body.password)
    .await
    .map_err(auth_error)?;
  Ok(Json(json!({ "principal": principal })))
}
