//! [`SqliteStore`], the SQLite implementation of the Cerimonial store
//! traits.

use std::path::Path;

use cerimonial_core::{
  Entity, EntityKind, Identity, Record,
  branding::Branding,
  event::{Event, EventPatch},
  password::{hash_password, needs_rehash, verify_password},
  store::{BrandingStore, CredentialStore, RecordStore, SessionStore},
  user::{NewUser, Session, User},
};
use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{RawRecord, RawSession, RawUser, encode_body, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Cerimonial store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
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

  /// Look a user up by exact email.
  pub(crate) async fn find_user(&self, email: &str) -> Result<Option<User>> {
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, email, password_hash, name, created_at
             FROM users WHERE email = ?1",
            rusqlite::params![email],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  /// Insert a user row. Returns `false` if the email is already taken.
  async fn insert_user(&self, user: &User) -> Result<bool> {
    let id_str = encode_uuid(user.id);
    let email = user.email.clone();
    let hash = user.password_hash.clone();
    let name = user.name.clone();
    let at_str = encode_dt(user.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let outcome = conn.execute(
          "INSERT INTO users (user_id, email, password_hash, name, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, email, hash, name, at_str],
        );
        match outcome {
          Ok(_) => Ok(true),
          Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
          {
            Ok(false)
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(inserted)
  }

  async fn set_password_hash(&self, user_id: Uuid, hash: String) -> Result<()> {
    let id_str = encode_uuid(user_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET password_hash = ?1 WHERE user_id = ?2",
          rusqlite::params![hash, id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built record into its kind's table.
  async fn insert_record<T: Entity>(&self, record: &Record<T>) -> Result<()> {
    let table = T::KIND.table();
    let id_str = encode_uuid(record.id);
    let owner_str = encode_uuid(record.user_id);
    let created_str = encode_dt(record.created_at);
    let updated_str = record.updated_at.map(encode_dt);
    let body = encode_body(&record.data)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO {table} (record_id, user_id, created_at, updated_at, body_json)
             VALUES (?1, ?2, ?3, ?4, ?5)"
          ),
          rusqlite::params![id_str, owner_str, created_str, updated_str, body],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Unlink a deleted client from the owner's events. The events keep their
  /// client name snapshot.
  async fn detach_client(&self, owner: &Identity, client_id: Uuid) -> Result<usize> {
    let events: Vec<Record<Event>> = self.list(owner).await?;
    let mut detached = 0;

    for event in events.into_iter().filter(|e| e.data.client_id == Some(client_id)) {
      let patch = EventPatch { client_id: Some(None), ..Default::default() };
      if self.update::<Event>(owner, event.id, patch).await? {
        detached += 1;
      }
    }
    Ok(detached)
  }

  /// Drop a deleted vendor from every one of the owner's events.
  async fn detach_vendor(&self, owner: &Identity, vendor_id: Uuid) -> Result<usize> {
    let events: Vec<Record<Event>> = self.list(owner).await?;
    let mut detached = 0;

    for mut event in events.into_iter().filter(|e| e.data.vendor_ids.contains(&vendor_id)) {
      event.data.vendor_ids.remove(&vendor_id);
      let patch = EventPatch { vendor_ids: Some(event.data.vendor_ids), ..Default::default() };
      if self.update::<Event>(owner, event.id, patch).await? {
        detached += 1;
      }
    }
    Ok(detached)
  }
}

// ─── CredentialStore impl ────────────────────────────────────────────────────

impl CredentialStore for SqliteStore {
  type Error = Error;

  async fn register(&self, input: NewUser) -> Result<Identity> {
    if self.find_user(&input.email).await?.is_some() {
      return Err(Error::DuplicateEmail(input.email));
    }

    let password = input.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    let user = User {
      id: Uuid::new_v4(),
      email: input.email,
      password_hash,
      name: input.name,
      created_at: Utc::now(),
    };

    if !self.insert_user(&user).await? {
      return Err(Error::DuplicateEmail(user.email));
    }

    tracing::info!(user_id = %user.id, "registered account");
    Ok(user.identity())
  }

  async fn authenticate(&self, email: &str, password: &str) -> Result<Identity> {
    let user = self.find_user(email).await?.ok_or(Error::InvalidCredentials)?;

    let candidate = password.to_owned();
    let stored = user.password_hash.clone();
    let valid =
      tokio::task::spawn_blocking(move || verify_password(&candidate, &stored)).await?;
    if !valid {
      return Err(Error::InvalidCredentials);
    }

    if needs_rehash(&user.password_hash) {
      let candidate = password.to_owned();
      let upgraded = tokio::task::spawn_blocking(move || hash_password(&candidate)).await??;
      self.set_password_hash(user.id, upgraded).await?;
      tracing::warn!(user_id = %user.id, "replaced legacy password hash with argon2");
    }

    tracing::info!(user_id = %user.id, "authenticated");
    Ok(user.identity())
  }

  async fn import_user(&self, user: User) -> Result<Identity> {
    if !self.insert_user(&user).await? {
      return Err(Error::DuplicateEmail(user.email));
    }
    tracing::info!(user_id = %user.id, "imported account");
    Ok(user.identity())
  }
}

// ─── SessionStore impl ───────────────────────────────────────────────────────

impl SessionStore for SqliteStore {
  type Error = Error;

  async fn start_session(&self, identity: Identity) -> Result<Session> {
    let session = Session { identity, started_at: Utc::now() };

    let id_str = encode_uuid(session.identity.id);
    let email = session.identity.email.clone();
    let name = session.identity.name.clone();
    let at_str = encode_dt(session.started_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO session (slot, user_id, email, name, started_at)
           VALUES (0, ?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, email, name, at_str],
        )?;
        Ok(())
      })
      .await?;

    tracing::info!(user_id = %session.identity.id, "session started");
    Ok(session)
  }

  async fn restore_session(&self) -> Result<Option<Session>> {
    let raw: Option<RawSession> = self
      .conn
      .call(|conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, email, name, started_at FROM session WHERE slot = 0",
            [],
            |row| {
              Ok(RawSession {
                user_id:    row.get(0)?,
                email:      row.get(1)?,
                name:       row.get(2)?,
                started_at: row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSession::into_session).transpose()
  }

  async fn end_session(&self) -> Result<bool> {
    let removed = self
      .conn
      .call(|conn| Ok(conn.execute("DELETE FROM session", [])?))
      .await?;

    if removed > 0 {
      tracing::info!("session ended");
    }
    Ok(removed > 0)
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  async fn list<T: Entity>(&self, owner: &Identity) -> Result<Vec<Record<T>>> {
    let table = T::KIND.table();
    let owner_str = encode_uuid(owner.id);

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT record_id, user_id, created_at, updated_at, body_json
           FROM {table}
           WHERE user_id = ?1
           ORDER BY created_at, rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  async fn create<T: Entity>(&self, owner: &Identity, data: T) -> Result<Record<T>> {
    let record = Record {
      id: Uuid::new_v4(),
      user_id: owner.id,
      created_at: Utc::now(),
      updated_at: None,
      data,
    };

    self.insert_record(&record).await?;
    tracing::debug!(kind = %T::KIND, record_id = %record.id, "created record");
    Ok(record)
  }

  async fn update<T: Entity>(&self, owner: &Identity, id: Uuid, patch: T::Patch) -> Result<bool> {
    let Some(mut record) = self.get_by_id::<T>(owner, id).await? else {
      return Ok(false);
    };

    record.data.apply(patch);

    let table = T::KIND.table();
    let body = encode_body(&record.data)?;
    let at_str = encode_dt(Utc::now());
    let id_str = encode_uuid(id);
    let owner_str = encode_uuid(owner.id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!(
            "UPDATE {table} SET body_json = ?1, updated_at = ?2
             WHERE record_id = ?3 AND user_id = ?4"
          ),
          rusqlite::params![body, at_str, id_str, owner_str],
        )?)
      })
      .await?;

    tracing::debug!(kind = %T::KIND, record_id = %id, "updated record");
    Ok(changed > 0)
  }

  async fn delete<T: Entity>(&self, owner: &Identity, id: Uuid) -> Result<bool> {
    let table = T::KIND.table();
    let id_str = encode_uuid(id);
    let owner_str = encode_uuid(owner.id);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("DELETE FROM {table} WHERE record_id = ?1 AND user_id = ?2"),
          rusqlite::params![id_str, owner_str],
        )?)
      })
      .await?;

    if removed == 0 {
      return Ok(false);
    }

    let detached = match T::KIND {
      EntityKind::Clients => self.detach_client(owner, id).await?,
      EntityKind::Vendors => self.detach_vendor(owner, id).await?,
      EntityKind::Events => 0,
    };
    tracing::debug!(kind = %T::KIND, record_id = %id, detached, "deleted record");
    Ok(true)
  }

  async fn get_by_id<T: Entity>(&self, owner: &Identity, id: Uuid) -> Result<Option<Record<T>>> {
    let table = T::KIND.table();
    let id_str = encode_uuid(id);
    let owner_str = encode_uuid(owner.id);

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT record_id, user_id, created_at, updated_at, body_json
               FROM {table}
               WHERE record_id = ?1 AND user_id = ?2"
            ),
            rusqlite::params![id_str, owner_str],
            RawRecord::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn restore<T: Entity>(&self, owner: &Identity, mut record: Record<T>) -> Result<()> {
    record.user_id = owner.id;
    self.insert_record(&record).await
  }

  async fn clear(&self, owner: &Identity) -> Result<()> {
    let owner_str = encode_uuid(owner.id);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for kind in EntityKind::ALL {
          tx.execute(
            &format!("DELETE FROM {} WHERE user_id = ?1", kind.table()),
            rusqlite::params![owner_str],
          )?;
        }
        tx.execute("DELETE FROM branding WHERE user_id = ?1", rusqlite::params![owner_str])?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!(user_id = %owner.id, "cleared all user data");
    Ok(())
  }
}

// ─── BrandingStore impl ──────────────────────────────────────────────────────

impl BrandingStore for SqliteStore {
  type Error = Error;

  async fn branding(&self, owner: &Identity) -> Result<Branding> {
    let owner_str = encode_uuid(owner.id);

    let row: Option<(Option<String>, Option<String>, Option<String>)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT label, primary_color, logo FROM branding WHERE user_id = ?1",
            rusqlite::params![owner_str],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
          )
          .optional()?)
      })
      .await?;

    Ok(
      row
        .map(|(label, color, logo)| Branding::from_parts(label, color, logo))
        .unwrap_or_default(),
    )
  }

  async fn save_branding(&self, owner: &Identity, branding: Branding) -> Result<()> {
    let owner_str = encode_uuid(owner.id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO branding (user_id, label, primary_color, logo)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(user_id) DO UPDATE SET
             label         = excluded.label,
             primary_color = excluded.primary_color,
             logo          = excluded.logo",
          rusqlite::params![owner_str, branding.label, branding.primary_color, branding.logo],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
