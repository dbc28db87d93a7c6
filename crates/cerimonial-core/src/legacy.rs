//! Decoding of the browser version's local-storage dump.
//!
//! The browser kept everything under keys prefixed `cerimonial_db_`: one
//! JSON-encoded list per table (`users`, `clients`, `events`, `vendors`) and
//! one plain string per branding setting (`brand_label_<userId>`,
//! `primary_color_<userId>`, `logo_<userId>`). Ids were millisecond
//! timestamps and most numbers were stored as the raw form strings.
//!
//! [`decode`] turns such a dump into fully-formed users and records with
//! fresh UUIDs, every reference remapped. Rows that cannot be placed are
//! reported in [`LegacyExport::skipped`] instead of failing the whole
//! import.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
  Error, Money, Result,
  branding::Branding,
  client::Client,
  event::{ChecklistItem, Event, EventStatus, UNKNOWN_CLIENT},
  record::{EntityKind, Record},
  user::User,
  vendor::{Product, Vendor},
};

pub const KEY_PREFIX: &str = "cerimonial_db_";

/// Everything one legacy account owned.
#[derive(Debug, Clone)]
pub struct LegacyAccount {
  pub user:     User,
  pub clients:  Vec<Record<Client>>,
  pub events:   Vec<Record<Event>>,
  pub vendors:  Vec<Record<Vendor>>,
  pub branding: Option<Branding>,
}

#[derive(Debug, Clone, Default)]
pub struct LegacyExport {
  pub accounts: Vec<LegacyAccount>,
  /// Human-readable notes about rows that were dropped.
  pub skipped:  Vec<String>,
}

/// Decode a dump given as a JSON object of storage keys to values.
pub fn decode(input: &str, now: DateTime<Utc>) -> Result<LegacyExport> {
  let root: Value = serde_json::from_str(input)?;
  let Value::Object(entries) = root else {
    return Err(Error::Legacy("expected a JSON object of storage keys".into()));
  };

  let mut export = LegacyExport::default();
  let mut owners: HashMap<String, usize> = HashMap::new();

  for raw in read_list(&entries, "users")? {
    let legacy_id = text(&raw, "id");
    let email = text(&raw, "email");
    if legacy_id.is_empty() || email.is_empty() {
      export.skipped.push(format!("user without id or email: {raw}"));
      continue;
    }
    if owners.contains_key(&legacy_id) {
      export.skipped.push(format!("user with duplicate id {legacy_id}: {email}"));
      continue;
    }
    let user = User {
      id:            Uuid::new_v4(),
      email,
      password_hash: text(&raw, "password"),
      name:          text(&raw, "name"),
      created_at:    now,
    };
    owners.insert(legacy_id.clone(), export.accounts.len());
    export.accounts.push(LegacyAccount {
      branding: read_branding(&entries, &legacy_id),
      user,
      clients: Vec::new(),
      events: Vec::new(),
      vendors: Vec::new(),
    });
  }

  let mut client_ids: HashMap<String, Uuid> = HashMap::new();
  for raw in read_list(&entries, EntityKind::Clients.table())? {
    let Some((slot, env)) = envelope(&raw, &owners, &export, now) else {
      export.skipped.push(format!("client with unknown owner: {}", text(&raw, "id")));
      continue;
    };
    client_ids.insert(text(&raw, "id"), env.0);
    let contract = Some(text(&raw, "contract")).filter(|c| !c.is_empty());
    let data = Client {
      name: text(&raw, "name"),
      email: text(&raw, "email"),
      phone: text(&raw, "phone"),
      contract,
    };
    export.accounts[slot].clients.push(env.with(data));
  }

  let mut vendor_ids: HashMap<String, Uuid> = HashMap::new();
  for raw in read_list(&entries, EntityKind::Vendors.table())? {
    let Some((slot, env)) = envelope(&raw, &owners, &export, now) else {
      export.skipped.push(format!("vendor with unknown owner: {}", text(&raw, "id")));
      continue;
    };
    vendor_ids.insert(text(&raw, "id"), env.0);
    let products = items(&raw, "products")
      .map(|p| {
        let price = money(p, "price");
        let quantity = number(p, "quantity").filter(|q| *q > 0.0).unwrap_or(1.0);
        Product {
          id: Uuid::new_v4(),
          name: text(p, "name"),
          quantity,
          price,
          total: price.scale(quantity),
        }
      })
      .collect();
    let data = Vendor {
      name: text(&raw, "name"),
      category: text(&raw, "category"),
      contact: text(&raw, "contact"),
      products,
    };
    export.accounts[slot].vendors.push(env.with(data));
  }

  for raw in read_list(&entries, EntityKind::Events.table())? {
    let Some((slot, env)) = envelope(&raw, &owners, &export, now) else {
      export.skipped.push(format!("event with unknown owner: {}", text(&raw, "id")));
      continue;
    };
    let Some(date) = NaiveDate::parse_from_str(&text(&raw, "date"), "%Y-%m-%d").ok() else {
      export.skipped.push(format!("event without a valid date: {}", text(&raw, "title")));
      continue;
    };

    let checklist = items(&raw, "checklist")
      .map(|i| ChecklistItem {
        id:        Uuid::new_v4(),
        text:      text(i, "text"),
        completed: i.get("completed").and_then(Value::as_bool).unwrap_or(false),
      })
      .collect();

    let vendor_refs: BTreeSet<Uuid> = match raw.get("vendorIds") {
      Some(Value::Array(ids)) => {
        ids.iter().filter_map(|v| vendor_ids.get(&scalar(v))).copied().collect()
      }
      Some(Value::String(id)) => vendor_ids.get(id).copied().into_iter().collect(),
      _ => BTreeSet::new(),
    };

    let client_name = Some(text(&raw, "clientName")).filter(|n| !n.is_empty());
    let status = if text(&raw, "status") == EventStatus::Completed.to_string() {
      EventStatus::Completed
    } else {
      EventStatus::Scheduled
    };

    let data = Event {
      title: text(&raw, "title"),
      client_id: client_ids.get(&text(&raw, "clientId")).copied(),
      client_name: client_name.unwrap_or_else(|| UNKNOWN_CLIENT.to_owned()),
      date,
      time: parse_time(&text(&raw, "time")),
      guest_count: number(&raw, "guestCount").map_or(0, |n| n.max(0.0) as u32),
      value_per_guest: money(&raw, "valuePerGuest"),
      status,
      checklist,
      vendor_ids: vendor_refs,
    };
    export.accounts[slot].events.push(env.with(data));
  }

  Ok(export)
}

// ─── Envelope ────────────────────────────────────────────────────────────────

/// Id and timestamps of a record before its payload is decoded.
struct Envelope(Uuid, Uuid, DateTime<Utc>, Option<DateTime<Utc>>);

impl Envelope {
  fn with<T>(self, data: T) -> Record<T> {
    Record { id: self.0, user_id: self.1, created_at: self.2, updated_at: self.3, data }
  }
}

fn envelope(
  raw: &Value,
  owners: &HashMap<String, usize>,
  export: &LegacyExport,
  now: DateTime<Utc>,
) -> Option<(usize, Envelope)> {
  let slot = *owners.get(&text(raw, "userId"))?;
  let owner = export.accounts[slot].user.id;
  let created_at = timestamp(raw, "createdAt").unwrap_or(now);
  Some((slot, Envelope(Uuid::new_v4(), owner, created_at, timestamp(raw, "updatedAt"))))
}

// ─── Storage keys ────────────────────────────────────────────────────────────

fn read_list(entries: &Map<String, Value>, table: &str) -> Result<Vec<Value>> {
  let key = format!("{KEY_PREFIX}{table}");
  match entries.get(&key) {
    None | Some(Value::Null) => Ok(Vec::new()),
    Some(Value::Array(items)) => Ok(items.clone()),
    Some(Value::String(encoded)) => match serde_json::from_str::<Value>(encoded)? {
      Value::Array(items) => Ok(items),
      _ => Err(Error::Legacy(format!("{key} does not hold a list"))),
    },
    Some(_) => Err(Error::Legacy(format!("{key} does not hold a list"))),
  }
}

fn read_branding(entries: &Map<String, Value>, legacy_user_id: &str) -> Option<Branding> {
  let setting = |name: &str| {
    entries
      .get(&format!("{KEY_PREFIX}{name}_{legacy_user_id}"))
      .and_then(Value::as_str)
      .map(str::to_owned)
  };
  let (label, color, logo) = (setting("brand_label"), setting("primary_color"), setting("logo"));
  if label.is_none() && color.is_none() && logo.is_none() {
    return None;
  }
  Some(Branding::from_parts(label, color, logo))
}

// ─── Lenient field readers ───────────────────────────────────────────────────

fn scalar(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    Value::Number(n) => n.to_string(),
    Value::Bool(b) => b.to_string(),
    _ => String::new(),
  }
}

fn text(raw: &Value, field: &str) -> String { raw.get(field).map(scalar).unwrap_or_default() }

fn number(raw: &Value, field: &str) -> Option<f64> {
  let n = match raw.get(field)? {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().replace(',', ".").parse().ok(),
    _ => None,
  };
  n.filter(|n| n.is_finite())
}

fn money(raw: &Value, field: &str) -> Money {
  let exact = match raw.get(field) {
    Some(Value::String(s)) => s.parse().ok(),
    _ => None,
  };
  exact
    .or_else(|| number(raw, field).map(Money::from_reais))
    .unwrap_or(Money::ZERO)
}

fn items<'a>(raw: &'a Value, field: &str) -> impl Iterator<Item = &'a Value> {
  raw.get(field).and_then(Value::as_array).into_iter().flatten()
}

fn timestamp(raw: &Value, field: &str) -> Option<DateTime<Utc>> {
  raw
    .get(field)
    .and_then(Value::as_str)
    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    .map(|dt| dt.with_timezone(&Utc))
}

fn parse_time(s: &str) -> Option<NaiveTime> {
  NaiveTime::parse_from_str(s, "%H:%M")
    .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
    .ok()
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn dump() -> String {
    let users = json!([
      { "id": "1700000000000", "email": "ana@example.com", "password": "ab".repeat(32),
        "name": "Ana" },
      { "id": "1700000000001", "email": "", "password": "x", "name": "Sem email" }
    ]);
    let clients = json!([
      { "id": "c1", "userId": "1700000000000", "name": "Maria", "email": "maria@example.com",
        "phone": "11", "createdAt": "2024-05-01T12:00:00.000Z" },
      { "id": "c2", "userId": "ghost", "name": "Orphan", "email": "", "phone": "" }
    ]);
    let vendors = json!([
      { "id": "v1", "userId": "1700000000000", "name": "Buffet", "category": "Buffet",
        "contact": "x",
        "products": [
          { "id": "p", "name": "Jantar", "quantity": 2, "price": 150.5, "total": 301 }
        ] }
    ]);
    let events = json!([
      { "id": "e1", "userId": "1700000000000", "title": "Casamento", "clientId": "c1",
        "clientName": "Maria", "date": "2026-11-14", "time": "19:30", "guestCount": "100",
        "valuePerGuest": "50.00", "totalValue": "5000.00", "vendorIds": ["v1", "missing"],
        "status": "Finalizado",
        "checklist": [ { "id": "1", "text": "Buffet", "completed": true } ] },
      { "id": "e2", "userId": "1700000000000", "title": "Sem data", "date": "" }
    ]);

    json!({
      "cerimonial_db_users": users.to_string(),
      "cerimonial_db_clients": clients.to_string(),
      "cerimonial_db_vendors": vendors,
      "cerimonial_db_events": events.to_string(),
      "cerimonial_db_brand_label_1700000000000": "Ana Eventos",
      "cerimonial_db_session": "{}"
    })
    .to_string()
  }

  #[test]
  fn decodes_and_remaps_references() {
    let export = decode(&dump(), Utc::now()).unwrap();
    assert_eq!(export.accounts.len(), 1);

    let account = &export.accounts[0];
    assert_eq!(account.user.email, "ana@example.com");
    assert_eq!(account.branding.as_ref().unwrap().label, "Ana Eventos");

    assert_eq!(account.clients.len(), 1);
    let client = &account.clients[0];
    assert_eq!(client.user_id, account.user.id);
    assert_eq!(client.created_at.to_rfc3339(), "2024-05-01T12:00:00+00:00");

    let vendor = &account.vendors[0];
    assert_eq!(vendor.data.products[0].total, Money::from_cents(30100));

    assert_eq!(account.events.len(), 1);
    let event = &account.events[0].data;
    assert_eq!(event.client_id, Some(client.id));
    assert_eq!(event.vendor_ids.iter().copied().collect::<Vec<_>>(), vec![vendor.id]);
    assert_eq!(event.guest_count, 100);
    assert_eq!(event.total_value(), Money::from_cents(500_000));
    assert_eq!(event.status, EventStatus::Completed);
    assert_eq!(event.time, NaiveTime::from_hms_opt(19, 30, 0));
    assert_eq!(event.progress(), 100);
  }

  #[test]
  fn reports_skipped_rows() {
    let export = decode(&dump(), Utc::now()).unwrap();
    assert_eq!(export.skipped.len(), 3, "{:?}", export.skipped);
  }

  #[test]
  fn rejects_non_object_dump() {
    assert!(matches!(decode("[]", Utc::now()), Err(Error::Legacy(_))));
    assert!(decode("{}", Utc::now()).unwrap().accounts.is_empty());
  }

  #[test]
  fn duplicate_user_id_keeps_the_first_account() {
    let users = json!([
      { "id": "7", "email": "ana@example.com", "password": "x", "name": "Ana" },
      { "id": "7", "email": "bia@example.com", "password": "y", "name": "Bia" }
    ]);
    let clients = json!([{ "id": "c1", "userId": "7", "name": "Maria", "email": "", "phone": "" }]);
    let input = json!({
      "cerimonial_db_users": users.to_string(),
      "cerimonial_db_clients": clients.to_string(),
    })
    .to_string();

    let export = decode(&input, Utc::now()).unwrap();
    assert_eq!(export.accounts.len(), 1);
    assert_eq!(export.accounts[0].user.email, "ana@example.com");
    assert_eq!(export.accounts[0].clients.len(), 1);
    assert_eq!(export.skipped.len(), 1);
    assert!(export.skipped[0].contains("bia@example.com"));
  }
}
