//! The storage traits: credentials, the session slot, owner-scoped records
//! and branding.
//!
//! Implemented by `cerimonial-store-sqlite`.
//!
//! There is no ambient "current user": every record call receives the owner
//! [`Identity`] explicitly, normally the one returned by
//! [`SessionStore::restore_session`].

use std::future::Future;

use uuid::Uuid;

use crate::{
  branding::Branding,
  record::{Entity, Record},
  user::{Identity, NewUser, Session, User},
};

// ─── Credentials ─────────────────────────────────────────────────────────────

pub trait CredentialStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create an account. Fails with a duplicate-email error if the address is
  /// already registered (exact, case-sensitive match).
  fn register(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + '_;

  /// Verify an email/password pair. Unknown email and wrong password fail
  /// with the same invalid-credentials error.
  fn authenticate<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + 'a;

  /// Insert a fully-formed user whose id and hash come from elsewhere
  /// (legacy import). Same duplicate-email rule as [`register`](Self::register).
  fn import_user(
    &self,
    user: User,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + '_;
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// A single durable slot holding the signed-in identity.
pub trait SessionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Replace whatever is in the slot with `identity`.
  fn start_session(
    &self,
    identity: Identity,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + '_;

  /// Read the slot; `None` when nobody is signed in.
  fn restore_session(
    &self,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + '_;

  /// Clear the slot. Returns `true` if a session was active.
  fn end_session(&self) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// Generic owner-scoped storage for clients, events and vendors.
///
/// No method ever returns or modifies a record whose `user_id` differs from
/// `owner.id`.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All of `owner`'s records of type `T`, oldest first.
  fn list<'a, T: Entity>(
    &'a self,
    owner: &'a Identity,
  ) -> impl Future<Output = Result<Vec<Record<T>>, Self::Error>> + Send + 'a;

  /// Persist a new record with a fresh id, stamped with the owner and the
  /// creation time.
  fn create<'a, T: Entity>(
    &'a self,
    owner: &'a Identity,
    data: T,
  ) -> impl Future<Output = Result<Record<T>, Self::Error>> + Send + 'a;

  /// Merge `patch` into the owned record `id` and stamp the update time.
  /// Returns `false` without writing if the owner has no such record.
  fn update<'a, T: Entity>(
    &'a self,
    owner: &'a Identity,
    id: Uuid,
    patch: T::Patch,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Remove the owned record `id`. Returns `false` if there was none.
  fn delete<'a, T: Entity>(
    &'a self,
    owner: &'a Identity,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn get_by_id<'a, T: Entity>(
    &'a self,
    owner: &'a Identity,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Record<T>>, Self::Error>> + Send + 'a;

  /// Insert a record exactly as given (id and timestamps included), re-tagged
  /// with `owner`. Used by import.
  fn restore<'a, T: Entity>(
    &'a self,
    owner: &'a Identity,
    record: Record<T>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete every record and the branding owned by `owner`.
  fn clear<'a>(
    &'a self,
    owner: &'a Identity,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── Branding ────────────────────────────────────────────────────────────────

pub trait BrandingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The owner's branding, defaults applied.
  fn branding<'a>(
    &'a self,
    owner: &'a Identity,
  ) -> impl Future<Output = Result<Branding, Self::Error>> + Send + 'a;

  fn save_branding<'a>(
    &'a self,
    owner: &'a Identity,
    branding: Branding,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
