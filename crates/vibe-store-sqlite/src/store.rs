//! [`SqliteStore`] — the SQLite implementation of [`DocumentStore`].
//!
//! Array union/removal runs read-modify-write inside a single connection
//! call, so each update is applied atomically with respect to other updates
//! on the same store.

use std::{path::Path, sync::Arc};

use rusqlite::OptionalExtension as _;
use serde_json::Value;
use tokio::sync::watch;
use vibe_core::{
  session::Session,
  store::{Document, DocumentStore},
};

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Vibe backend stored in a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted, and all
/// clones publish to the same session watch channel.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn:       tokio_rusqlite::Connection,
  pub(crate) session_tx: Arc<watch::Sender<Session>>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::from_connection(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::from_connection(conn).await
  }

  async fn from_connection(conn: tokio_rusqlite::Connection) -> Result<Self> {
    let store = Self {
      conn,
      session_tx: Arc::new(watch::Sender::new(Session::Unknown)),
    };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Wrap a JSON error for transport out of a connection closure.
fn json_err(e: serde_json::Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

/// Coerce `field` to an array in place, replacing any non-array value.
/// Mirrors the managed-store behaviour of the array update primitives.
fn array_field_mut<'a>(
  doc: &'a mut Document,
  field: &str,
) -> &'a mut Vec<Value> {
  if !matches!(doc.get(field), Some(Value::Array(_))) {
    doc.insert(field.to_owned(), Value::Array(Vec::new()));
  }
  match doc.get_mut(field) {
    Some(Value::Array(items)) => items,
    _ => unreachable!("field was just coerced to an array"),
  }
}

// ─── DocumentStore ───────────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  type Error = Error;

  async fn get_document(
    &self,
    collection: &str,
    key: &str,
  ) -> Result<Option<Document>> {
    let c = collection.to_owned();
    let k = key.to_owned();

    let body: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT body FROM documents WHERE collection = ?1 AND key = ?2",
              rusqlite::params![c, k],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    body
      .map(|b| serde_json::from_str::<Document>(&b))
      .transpose()
      .map_err(Error::Json)
  }

  async fn scan_collection(
    &self,
    collection: &str,
  ) -> Result<Vec<(String, Document)>> {
    let c = collection.to_owned();

    let rows: Vec<(String, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT key, body FROM documents WHERE collection = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![c], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(key, body)| Ok((key, serde_json::from_str(&body)?)))
      .collect()
  }

  async fn set_document(
    &self,
    collection: &str,
    key: &str,
    fields: Document,
    merge: bool,
  ) -> Result<()> {
    let c = collection.to_owned();
    let k = key.to_owned();

    self
      .conn
      .call(move |conn| {
        let body = if merge {
          let existing: Option<String> = conn
            .query_row(
              "SELECT body FROM documents WHERE collection = ?1 AND key = ?2",
              rusqlite::params![c, k],
              |r| r.get(0),
            )
            .optional()?;
          let mut doc: Document = match existing {
            Some(b) => serde_json::from_str(&b).map_err(json_err)?,
            None => Document::new(),
          };
          for (name, value) in fields {
            doc.insert(name, value);
          }
          serde_json::to_string(&doc).map_err(json_err)?
        } else {
          serde_json::to_string(&fields).map_err(json_err)?
        };

        conn.execute(
          "INSERT INTO documents (collection, key, body) VALUES (?1, ?2, ?3)
           ON CONFLICT (collection, key) DO UPDATE SET body = excluded.body",
          rusqlite::params![c, k, body],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn union_array_field(
    &self,
    collection: &str,
    key: &str,
    field: &str,
    value: Value,
  ) -> Result<()> {
    let c = collection.to_owned();
    let k = key.to_owned();
    let f = field.to_owned();

    let found = self
      .conn
      .call(move |conn| {
        let existing: Option<String> = conn
          .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND key = ?2",
            rusqlite::params![c, k],
            |r| r.get(0),
          )
          .optional()?;
        let Some(body) = existing else { return Ok(false) };

        let mut doc: Document =
          serde_json::from_str(&body).map_err(json_err)?;
        let items = array_field_mut(&mut doc, &f);
        if !items.contains(&value) {
          items.push(value);
        }
        let body = serde_json::to_string(&doc).map_err(json_err)?;

        conn.execute(
          "UPDATE documents SET body = ?3 WHERE collection = ?1 AND key = ?2",
          rusqlite::params![c, k, body],
        )?;
        Ok(true)
      })
      .await?;

    if !found {
      return Err(Error::DocumentNotFound {
        collection: collection.to_owned(),
        key:        key.to_owned(),
      });
    }
    Ok(())
  }

  async fn remove_array_field(
    &self,
    collection: &str,
    key: &str,
    field: &str,
    value: Value,
  ) -> Result<()> {
    let c = collection.to_owned();
    let k = key.to_owned();
    let f = field.to_owned();

    let found = self
      .conn
      .call(move |conn| {
        let existing: Option<String> = conn
          .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND key = ?2",
            rusqlite::params![c, k],
            |r| r.get(0),
          )
          .optional()?;
        let Some(body) = existing else { return Ok(false) };

        let mut doc: Document =
          serde_json::from_str(&body).map_err(json_err)?;
        let items = array_field_mut(&mut doc, &f);
        items.retain(|v| v != &value);
        let body = serde_json::to_string(&doc).map_err(json_err)?;

        conn.execute(
          "UPDATE documents SET body = ?3 WHERE collection = ?1 AND key = ?2",
          rusqlite::params![c, k, body],
        )?;
        Ok(true)
      })
      .await?;

    if !found {
      return Err(Error::DocumentNotFound {
        collection: collection.to_owned(),
        key:        key.to_owned(),
      });
    }
    Ok(())
  }
}
