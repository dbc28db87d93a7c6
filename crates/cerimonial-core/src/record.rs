//! Owner-scoped records and the [`Entity`] trait shared by clients, events
//! and vendors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use strum::{Display, EnumString};
use uuid::Uuid;

// ─── Entity kinds ────────────────────────────────────────────────────────────

/// The entity-type key of a record table.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
  Clients,
  Events,
  Vendors,
}

impl EntityKind {
  pub const ALL: [EntityKind; 3] = [EntityKind::Clients, EntityKind::Events, EntityKind::Vendors];

  /// Name of the SQL table (and legacy storage key) holding this kind.
  pub const fn table(self) -> &'static str {
    match self {
      EntityKind::Clients => "clients",
      EntityKind::Events => "events",
      EntityKind::Vendors => "vendors",
    }
  }
}

// ─── Entity trait ────────────────────────────────────────────────────────────

/// A record payload that can live in a scoped table.
///
/// `Patch` is the typed counterpart of a partial form submission: every
/// field present in the patch overwrites the stored value, every absent
/// field is left alone.
pub trait Entity:
  Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
  type Patch: Send + 'static;

  const KIND: EntityKind;

  /// Merge `patch` into `self` in place.
  fn apply(&mut self, patch: Self::Patch);

  /// Case-insensitive substring match for the free-text filter.
  /// `needle` is already lowercased.
  fn matches(&self, needle: &str) -> bool;
}

/// Lowercased substring test used by [`Entity::matches`] implementations.
pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(needle)
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// An entity row tagged with its owner and lifecycle timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
  pub id:         Uuid,
  /// The owning user; every read filters on it.
  pub user_id:    Uuid,
  pub created_at: DateTime<Utc>,
  /// Absent until the first successful update.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
  #[serde(flatten)]
  pub data:       T,
}

impl<T> Record<T> {
  /// The last time this record changed.
  pub fn last_modified(&self) -> DateTime<Utc> { self.updated_at.unwrap_or(self.created_at) }
}
