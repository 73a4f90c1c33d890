//! The [`SessionStore`] trait and session-change notifications.
//!
//! The session store authenticates principals and publishes the current
//! session state over a watch channel. Subscribers receive the state as of
//! subscription time and every change thereafter; dropping the receiver is
//! the unsubscribe.

use std::future::Future;

use thiserror::Error;
use tokio::sync::watch;

use crate::principal::Principal;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Authentication failures, separated from whatever the backend can fail
/// with so callers can tell a rejected credential from a broken provider.
#[derive(Debug, Error)]
pub enum AuthError<E>
where
  E: std::error::Error + 'static,
{
  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("an account already exists for {0}")]
  AccountExists(String),

  #[error("auth backend error: {0}")]
  Backend(#[source] E),
}

// ─── Session state ───────────────────────────────────────────────────────────

/// The authentication state most recently reported by the session store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
  /// No notification has been received yet.
  #[default]
  Unknown,
  /// The store reported that no principal is signed in.
  Anonymous,
  /// The store reported a signed-in principal.
  Authenticated(Principal),
}

impl Session {
  pub fn principal(&self) -> Option<&Principal> {
    match self {
      Session::Authenticated(p) => Some(p),
      _ => None,
    }
  }

  /// A watch fixed at this state, for contexts that resolve the principal
  /// per request instead of by subscription.
  pub fn into_watch(self) -> SessionWatch {
    watch::Sender::new(self).subscribe()
  }
}

/// A cancellable subscription to session changes. Dropped deterministically
/// on view teardown; no dangling callbacks.
pub type SessionWatch = watch::Receiver<Session>;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the managed identity provider.
///
/// `sign_in` and `sign_out` publish to subscribers; `authenticate` is the
/// same credential check without the broadcast, for per-request use.
pub trait SessionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create an account and return its principal. Fails with
  /// [`AuthError::AccountExists`] if an account already exists for `email`.
  fn sign_up<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Principal, AuthError<Self::Error>>> + Send + 'a;

  /// Verify credentials, publish the authenticated session to subscribers,
  /// and return the principal.
  fn sign_in<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Principal, AuthError<Self::Error>>> + Send + 'a;

  /// Verify credentials without touching the published session state.
  fn authenticate<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Principal, AuthError<Self::Error>>> + Send + 'a;

  /// Publish the anonymous session to subscribers.
  fn sign_out(&self);

  /// Subscribe to session changes. The receiver immediately holds the
  /// current state.
  fn subscribe(&self) -> SessionWatch;
}
