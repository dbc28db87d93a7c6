//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Entity payloads are stored
//! as compact JSON. UUIDs are stored as hyphenated lowercase strings.

use cerimonial_core::{
  Identity, Record,
  user::{Session, User},
};
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Entity payloads ─────────────────────────────────────────────────────────

pub fn encode_body<T: Serialize>(data: &T) -> Result<String> { Ok(serde_json::to_string(data)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub email:         String,
  pub password_hash: String,
  pub name:          String,
  pub created_at:    String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      email:         row.get(1)?,
      password_hash: row.get(2)?,
      name:          row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            decode_uuid(&self.user_id)?,
      email:         self.email,
      password_hash: self.password_hash,
      name:          self.name,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from the `session` slot.
pub struct RawSession {
  pub user_id:    String,
  pub email:      String,
  pub name:       String,
  pub started_at: String,
}

impl RawSession {
  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      identity:   Identity { id: decode_uuid(&self.user_id)?, email: self.email, name: self.name },
      started_at: decode_dt(&self.started_at)?,
    })
  }
}

/// Raw strings read directly from a record table row.
pub struct RawRecord {
  pub record_id:  String,
  pub user_id:    String,
  pub created_at: String,
  pub updated_at: Option<String>,
  pub body_json:  String,
}

impl RawRecord {
  /// Columns: `record_id, user_id, created_at, updated_at, body_json`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id:  row.get(0)?,
      user_id:    row.get(1)?,
      created_at: row.get(2)?,
      updated_at: row.get(3)?,
      body_json:  row.get(4)?,
    })
  }

  pub fn into_record<T: DeserializeOwned>(self) -> Result<Record<T>> {
    Ok(Record {
      id:         decode_uuid(&self.record_id)?,
      user_id:    decode_uuid(&self.user_id)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: self.updated_at.as_deref().map(decode_dt).transpose()?,
      data:       serde_json::from_str(&self.body_json)?,
    })
  }
}
