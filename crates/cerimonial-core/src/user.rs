//! Users and the public identity projection kept in the session slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. `password_hash` is either an argon2 PHC string or,
/// for accounts imported from the browser version, a legacy SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:            Uuid,
  pub email:         String,
  pub password_hash: String,
  pub name:          String,
  pub created_at:    DateTime<Utc>,
}

impl User {
  pub fn identity(&self) -> Identity {
    Identity { id: self.id, email: self.email.clone(), name: self.name.clone() }
  }
}

/// The public projection of a [`User`]: what the session slot stores and what
/// every record store call receives as its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub id:    Uuid,
  pub email: String,
  pub name:  String,
}

/// Input for [`CredentialStore::register`](crate::store::CredentialStore::register).
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:    String,
  pub password: String,
  pub name:     String,
}

/// The contents of the session slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub identity:   Identity,
  pub started_at: DateTime<Utc>,
}
