//! Auth guard — gates views on the published session state.
//!
//! The guard owns a [`SessionWatch`] taken at construction and drops it with
//! the view; that drop is the unsubscribe. It renders nothing itself — it
//! tells the caller whether to render, show a loading placeholder, or issue
//! a navigation side effect.

use vibe_core::{
  principal::Principal,
  session::{Session, SessionWatch},
};

use crate::{Error, Result};

/// Where a redirect should navigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
  Login,
  Feed,
}

/// The guard's verdict for a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
  /// No session notification has been received yet. Render a loading
  /// placeholder; no navigation side effect.
  Loading,
  /// Render the wrapped view.
  Render,
  /// Do not render; issue a navigation side effect instead.
  Redirect(Target),
}

pub struct AuthGuard {
  session: SessionWatch,
}

impl AuthGuard {
  pub fn new(session: SessionWatch) -> Self {
    Self { session }
  }

  /// The currently signed-in principal, if any.
  pub fn principal(&self) -> Option<Principal> {
    self.session.borrow().principal().cloned()
  }

  /// Verdict for a protected view: unauthenticated principals are sent to
  /// the login view. Protected content is never rendered while the last
  /// notification carried an absent principal.
  pub fn gate_protected(&self) -> Gate {
    match &*self.session.borrow() {
      Session::Unknown => Gate::Loading,
      Session::Anonymous => Gate::Redirect(Target::Login),
      Session::Authenticated(_) => Gate::Render,
    }
  }

  /// Verdict for the login/signup views: authenticated principals are sent
  /// to the feed instead.
  pub fn gate_public(&self) -> Gate {
    match &*self.session.borrow() {
      Session::Authenticated(_) => Gate::Redirect(Target::Feed),
      _ => Gate::Render,
    }
  }

  /// Wait for the next session notification.
  pub async fn changed(&mut self) -> Result<()> {
    self.session.changed().await.map_err(|_| Error::SessionClosed)
  }
}

#[cfg(test)]
mod tests {
  use tokio::sync::watch;
  use vibe_core::session::Session;

  use super::*;

  fn guard_with(initial: Session) -> (watch::Sender<Session>, AuthGuard) {
    let tx = watch::Sender::new(initial);
    let guard = AuthGuard::new(tx.subscribe());
    (tx, guard)
  }

  #[tokio::test]
  async fn loading_until_first_notification() {
    let (tx, mut guard) = guard_with(Session::Unknown);
    assert_eq!(guard.gate_protected(), Gate::Loading);

    tx.send_replace(Session::Authenticated("U1".into()));
    guard.changed().await.unwrap();
    assert_eq!(guard.gate_protected(), Gate::Render);
  }

  #[test]
  fn anonymous_is_redirected_to_login() {
    let (_tx, guard) = guard_with(Session::Anonymous);
    assert_eq!(guard.gate_protected(), Gate::Redirect(Target::Login));
    assert_eq!(guard.principal(), None);
  }

  #[test]
  fn authenticated_is_redirected_away_from_login() {
    let (_tx, guard) = guard_with(Session::Authenticated("U1".into()));
    assert_eq!(guard.gate_public(), Gate::Redirect(Target::Feed));
    assert_eq!(guard.principal(), Some("U1".into()));
  }

  #[test]
  fn anonymous_may_see_login() {
    let (_tx, guard) = guard_with(Session::Anonymous);
    assert_eq!(guard.gate_public(), Gate::Render);
  }

  #[tokio::test]
  async fn sign_out_revokes_rendering() {
    let (tx, mut guard) = guard_with(Session::Authenticated("U1".into()));
    assert_eq!(guard.gate_protected(), Gate::Render);

    tx.send_replace(Session::Anonymous);
    guard.changed().await.unwrap();
    assert_eq!(guard.gate_protected(), Gate::Redirect(Target::Login));
  }

  #[tokio::test]
  async fn dropped_sender_surfaces_session_closed() {
    let (tx, mut guard) = guard_with(Session::Unknown);
    drop(tx);
    assert!(matches!(guard.changed().await, Err(Error::SessionClosed)));
  }

  #[test]
  fn dropping_the_guard_releases_the_subscription() {
    let tx = watch::Sender::new(Session::Unknown);
    let guard = AuthGuard::new(tx.subscribe());
    assert_eq!(tx.receiver_count(), 1);
    drop(guard);
    assert_eq!(tx.receiver_count(), 0);
  }
}
