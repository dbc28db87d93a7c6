//! Events: the ceremonies being planned, with their checklist and the
//! vendors booked for them.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{
  Money,
  client::Client,
  record::{Entity, EntityKind, contains_folded},
};

/// Client name stored on an event whose client could not be resolved.
pub const UNKNOWN_CLIENT: &str = "N/D";

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum EventStatus {
  #[default]
  #[strum(to_string = "Agendado", serialize = "scheduled")]
  Scheduled,
  #[strum(to_string = "Finalizado", serialize = "completed")]
  Completed,
}

// ─── Checklist ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
  pub id:        Uuid,
  pub text:      String,
  #[serde(default)]
  pub completed: bool,
}

/// Completion percentage of `done` out of `total` tasks, rounded half up.
/// An empty checklist is 0%.
pub fn percent(done: usize, total: usize) -> u8 {
  if total == 0 {
    return 0;
  }
  ((done * 200 + total) / (total * 2)).min(100) as u8
}

// ─── Event ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub title:           String,
  #[serde(default)]
  pub client_id:       Option<Uuid>,
  /// Snapshot of the client's name taken when the event was saved.
  pub client_name:     String,
  pub date:            NaiveDate,
  #[serde(default)]
  pub time:            Option<NaiveTime>,
  #[serde(default)]
  pub guest_count:     u32,
  #[serde(default)]
  pub value_per_guest: Money,
  #[serde(default)]
  pub status:          EventStatus,
  #[serde(default)]
  pub checklist:       Vec<ChecklistItem>,
  #[serde(default)]
  pub vendor_ids:      BTreeSet<Uuid>,
}

impl Event {
  /// A scheduled event with an empty checklist and no vendors.
  pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
    Self {
      title: title.into(),
      client_id: None,
      client_name: UNKNOWN_CLIENT.to_owned(),
      date,
      time: None,
      guest_count: 0,
      value_per_guest: Money::ZERO,
      status: EventStatus::Scheduled,
      checklist: Vec::new(),
      vendor_ids: BTreeSet::new(),
    }
  }

  /// Link the event to `client_id`, snapshotting the name of `client` (or
  /// [`UNKNOWN_CLIENT`] when the lookup found nothing).
  pub fn with_client(mut self, client_id: Uuid, client: Option<&Client>) -> Self {
    self.client_id = Some(client_id);
    self.client_name = client_display_name(client);
    self
  }

  pub fn total_value(&self) -> Money { self.value_per_guest.times(self.guest_count) }

  pub fn is_completed(&self) -> bool { self.status == EventStatus::Completed }

  pub fn finalize(&mut self) { self.status = EventStatus::Completed; }

  /// `(done, total)` checklist counts.
  pub fn checklist_counts(&self) -> (usize, usize) {
    let done = self.checklist.iter().filter(|i| i.completed).count();
    (done, self.checklist.len())
  }

  pub fn progress(&self) -> u8 {
    let (done, total) = self.checklist_counts();
    percent(done, total)
  }

  /// Append a pending checklist item and return its id.
  pub fn add_checklist_item(&mut self, text: impl Into<String>) -> Uuid {
    let id = Uuid::new_v4();
    self.checklist.push(ChecklistItem { id, text: text.into(), completed: false });
    id
  }

  /// Flip the completion flag of an item. Returns the new state, or `None`
  /// if no item has that id.
  pub fn toggle_checklist_item(&mut self, item_id: Uuid) -> Option<bool> {
    let item = self.checklist.iter_mut().find(|i| i.id == item_id)?;
    item.completed = !item.completed;
    Some(item.completed)
  }

  pub fn remove_checklist_item(&mut self, item_id: Uuid) -> bool {
    let before = self.checklist.len();
    self.checklist.retain(|i| i.id != item_id);
    self.checklist.len() != before
  }
}

/// The name to snapshot on an event for a (possibly missing) client.
pub fn client_display_name(client: Option<&Client>) -> String {
  client.map_or_else(|| UNKNOWN_CLIENT.to_owned(), |c| c.name.clone())
}

// ─── Patch ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct EventPatch {
  pub title:           Option<String>,
  /// `Some(None)` unlinks the client; the name snapshot is kept.
  pub client_id:       Option<Option<Uuid>>,
  pub client_name:     Option<String>,
  pub date:            Option<NaiveDate>,
  /// `Some(None)` clears the time.
  pub time:            Option<Option<NaiveTime>>,
  pub guest_count:     Option<u32>,
  pub value_per_guest: Option<Money>,
  pub status:          Option<EventStatus>,
  pub checklist:       Option<Vec<ChecklistItem>>,
  pub vendor_ids:      Option<BTreeSet<Uuid>>,
}

impl Entity for Event {
  type Patch = EventPatch;

  const KIND: EntityKind = EntityKind::Events;

  fn apply(&mut self, patch: EventPatch) {
    if let Some(title) = patch.title {
      self.title = title;
    }
    if let Some(client_id) = patch.client_id {
      self.client_id = client_id;
    }
    if let Some(client_name) = patch.client_name {
      self.client_name = client_name;
    }
    if let Some(date) = patch.date {
      self.date = date;
    }
    if let Some(time) = patch.time {
      self.time = time;
    }
    if let Some(guest_count) = patch.guest_count {
      self.guest_count = guest_count;
    }
    if let Some(value_per_guest) = patch.value_per_guest {
      self.value_per_guest = value_per_guest;
    }
    if let Some(status) = patch.status {
      self.status = status;
    }
    if let Some(checklist) = patch.checklist {
      self.checklist = checklist;
    }
    if let Some(vendor_ids) = patch.vendor_ids {
      self.vendor_ids = vendor_ids;
    }
  }

  fn matches(&self, needle: &str) -> bool {
    contains_folded(&self.title, needle) || contains_folded(&self.client_name, needle)
  }
}
