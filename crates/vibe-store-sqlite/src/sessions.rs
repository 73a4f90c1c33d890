//! [`SessionStore`] implementation: argon2-hashed accounts plus a watch
//! channel publishing the current session state.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use chrono::Utc;
use rand_core::OsRng;
use rusqlite::OptionalExtension as _;
use vibe_core::{
  principal::Principal,
  session::{AuthError, Session, SessionStore, SessionWatch},
};

use crate::{Error, Result, store::SqliteStore};

impl SqliteStore {
  /// Fetch `(principal, password_hash)` for an account, if it exists.
  async fn lookup_account(
    &self,
    email: &str,
  ) -> Result<Option<(String, String)>> {
    let email = email.to_owned();
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT principal, password_hash FROM accounts
                 WHERE email = ?1",
                rusqlite::params![email],
                |r| Ok((r.get(0)?, r.get(1)?)),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }
}

impl SessionStore for SqliteStore {
  type Error = Error;

  async fn sign_up(
    &self,
    email: &str,
    password: &str,
  ) -> Result<Principal, AuthError<Error>> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| AuthError::Backend(Error::PasswordHash(e.to_string())))?
      .to_string();
    let principal = Principal::generate();

    let email_owned   = email.to_owned();
    let principal_str = principal.as_str().to_owned();
    let created_at    = Utc::now().to_rfc3339();

    let inserted = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO accounts (email, principal, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![email_owned, principal_str, hash, created_at],
        ) {
          Ok(_) => Ok(true),
          Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
          {
            Ok(false)
          }
          Err(e) => Err(e.into()),
        }
      })
      .await
      .map_err(|e| AuthError::Backend(Error::Database(e)))?;

    if !inserted {
      return Err(AuthError::AccountExists(email.to_owned()));
    }

    // Sign-up signs the new account in, as the managed provider does.
    self
      .session_tx
      .send_replace(Session::Authenticated(principal.clone()));
    Ok(principal)
  }

  async fn authenticate(
    &self,
    email: &str,
    password: &str,
  ) -> Result<Principal, AuthError<Error>> {
    let account = self
      .lookup_account(email)
      .await
      .map_err(AuthError::Backend)?;
    let Some((principal, hash)) = account else {
      return Err(AuthError::InvalidCredentials);
    };

    let parsed =
      PasswordHash::new(&hash).map_err(|_| AuthError::InvalidCredentials)?;
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .map_err(|_| AuthError::InvalidCredentials)?;
    Ok(Principal(principal))
  }

  async fn sign_in(
    &self,
    email: &str,
    password: &str,
  ) -> Result<Principal, AuthError<Error>> {
    let principal = self.authenticate(email, password).await?;
    self
      .session_tx
      .send_replace(Session::Authenticated(principal.clone()));
    Ok(principal)
  }

  fn sign_out(&self) {
    self.session_tx.send_replace(Session::Anonymous);
  }

  fn subscribe(&self) -> SessionWatch {
    self.session_tx.subscribe()
  }
}
