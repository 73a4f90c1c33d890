//! HTTP Basic-auth extractor resolving the requesting principal.
//!
//! Every protected endpoint carries `Authorization: Basic b64(email:password)`;
//! the credentials are checked against the session store per request, without
//! publishing a session change.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use vibe_core::{
  principal::Principal,
  session::{AuthError, SessionStore},
  store::DocumentStore,
};

use crate::{AppState, error::ApiError};

/// Present in a handler signature means the request was authenticated.
pub struct Authenticated(pub Principal);

/// Verify Basic credentials against the session store.
pub async fn verify_basic<S>(
  headers: &HeaderMap,
  sessions: &S,
) -> Result<Principal, ApiError>
where
  S: SessionStore,
{
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds =
    std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;
  let (email, password) =
    creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  sessions.authenticate(email, password).await.map_err(|e| match e {
    AuthError::InvalidCredentials | AuthError::AccountExists(_) => {
      ApiError::Unauthorized
    }
    AuthError::Backend(e) => ApiError::store(e),
  })
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: DocumentStore + SessionStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_basic(&parts.headers, &*state.store)
      .await
      .map(Authenticated)
  }
}
