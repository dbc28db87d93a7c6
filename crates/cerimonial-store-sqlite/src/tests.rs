//! Integration tests for `SqliteStore` against an in-memory database.

use cerimonial_core::{
  Identity, Money, Record,
  branding::{Branding, DEFAULT_BRAND_LABEL},
  client::{Client, ClientPatch},
  event::{Event, EventPatch, EventStatus},
  password::legacy_digest,
  store::{BrandingStore, CredentialStore, RecordStore, SessionStore},
  user::{NewUser, User},
  vendor::Vendor,
};
use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_user(email: &str) -> NewUser {
  NewUser { email: email.into(), password: "s3nha-forte".into(), name: "Ana Planner".into() }
}

async fn signed_up(s: &SqliteStore, email: &str) -> Identity {
  s.register(new_user(email)).await.unwrap()
}

fn maria() -> Client { Client::new("Maria Silva", "maria@example.com", "11 99999-0000") }

fn wedding_date() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 11, 14).unwrap() }

// ─── Credentials ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_then_authenticate() {
  let s = store().await;
  let registered = signed_up(&s, "ana@example.com").await;

  let identity = s.authenticate("ana@example.com", "s3nha-forte").await.unwrap();
  assert_eq!(identity, registered);
  assert_eq!(identity.name, "Ana Planner");
  assert_eq!(identity.email, "ana@example.com");
}

#[tokio::test]
async fn duplicate_email_is_rejected_regardless_of_other_fields() {
  let s = store().await;
  signed_up(&s, "ana@example.com").await;

  let again = NewUser {
    email:    "ana@example.com".into(),
    password: "other".into(),
    name:     "Other".into(),
  };
  assert!(matches!(
    s.register(again).await,
    Err(Error::DuplicateEmail(e)) if e == "ana@example.com"
  ));
}

#[tokio::test]
async fn email_match_is_case_sensitive() {
  let s = store().await;
  signed_up(&s, "ana@example.com").await;

  assert!(s.register(new_user("Ana@Example.com")).await.is_ok());
  assert!(matches!(
    s.authenticate("ANA@EXAMPLE.COM", "s3nha-forte").await,
    Err(Error::InvalidCredentials)
  ));
}

#[tokio::test]
async fn wrong_password_and_unknown_email_fail_alike() {
  let s = store().await;
  signed_up(&s, "ana@example.com").await;

  assert!(matches!(
    s.authenticate("ana@example.com", "nope").await,
    Err(Error::InvalidCredentials)
  ));
  assert!(matches!(
    s.authenticate("bia@example.com", "s3nha-forte").await,
    Err(Error::InvalidCredentials)
  ));
}

#[tokio::test]
async fn stored_hash_is_salted_argon2() {
  let s = store().await;
  signed_up(&s, "a@example.com").await;
  signed_up(&s, "b@example.com").await;

  let a = s.find_user("a@example.com").await.unwrap().unwrap();
  let b = s.find_user("b@example.com").await.unwrap().unwrap();
  assert!(a.password_hash.starts_with("$argon2"));
  assert_ne!(a.password_hash, b.password_hash);
}

#[tokio::test]
async fn legacy_hash_is_accepted_and_upgraded() {
  let s = store().await;
  let user = User {
    id:            Uuid::new_v4(),
    email:         "legado@example.com".into(),
    password_hash: legacy_digest("antiga"),
    name:          "Legado".into(),
    created_at:    Utc::now(),
  };
  s.import_user(user.clone()).await.unwrap();

  let identity = s.authenticate("legado@example.com", "antiga").await.unwrap();
  assert_eq!(identity.id, user.id);

  let stored = s.find_user("legado@example.com").await.unwrap().unwrap();
  assert!(stored.password_hash.starts_with("$argon2"));
  assert!(s.authenticate("legado@example.com", "antiga").await.is_ok());
}

#[tokio::test]
async fn import_user_respects_unique_email() {
  let s = store().await;
  signed_up(&s, "ana@example.com").await;

  let clash = User {
    id:            Uuid::new_v4(),
    email:         "ana@example.com".into(),
    password_hash: legacy_digest("x"),
    name:          "Clash".into(),
    created_at:    Utc::now(),
  };
  assert!(matches!(s.import_user(clash).await, Err(Error::DuplicateEmail(_))));
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_start_restore_end() {
  let s = store().await;
  assert!(s.restore_session().await.unwrap().is_none());

  let ana = signed_up(&s, "ana@example.com").await;
  let started = s.start_session(ana.clone()).await.unwrap();

  let restored = s.restore_session().await.unwrap().unwrap();
  assert_eq!(restored.identity, ana);
  assert_eq!(restored.started_at, started.started_at);

  assert!(s.end_session().await.unwrap());
  assert!(s.restore_session().await.unwrap().is_none());
  assert!(!s.end_session().await.unwrap());
}

#[tokio::test]
async fn at_most_one_session() {
  let s = store().await;
  let ana = signed_up(&s, "ana@example.com").await;
  let bia = signed_up(&s, "bia@example.com").await;

  s.start_session(ana).await.unwrap();
  s.start_session(bia.clone()).await.unwrap();

  let restored = s.restore_session().await.unwrap().unwrap();
  assert_eq!(restored.identity, bia);
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_by_id_returns_input_plus_stamps() {
  let s = store().await;
  let ana = signed_up(&s, "ana@example.com").await;

  let before = Utc::now();
  let created = s.create(&ana, maria()).await.unwrap();

  assert_eq!(created.user_id, ana.id);
  assert!(created.created_at >= before);
  assert!(created.updated_at.is_none());
  assert_eq!(created.data, maria());

  let fetched: Record<Client> = s.get_by_id(&ana, created.id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn ids_are_unique_under_rapid_creation() {
  let s = store().await;
  let ana = signed_up(&s, "ana@example.com").await;

  let mut ids = std::collections::HashSet::new();
  for _ in 0..50 {
    ids.insert(s.create(&ana, maria()).await.unwrap().id);
  }
  assert_eq!(ids.len(), 50);
}

#[tokio::test]
async fn update_merges_patch_and_stamps() {
  let s = store().await;
  let ana = signed_up(&s, "ana@example.com").await;
  let created = s.create(&ana, maria()).await.unwrap();

  let patch = ClientPatch { phone: Some("21 3333-4444".into()), ..Default::default() };
  assert!(s.update::<Client>(&ana, created.id, patch).await.unwrap());

  let fetched: Record<Client> = s.get_by_id(&ana, created.id).await.unwrap().unwrap();
  assert_eq!(fetched.data.phone, "21 3333-4444");
  assert_eq!(fetched.data.name, "Maria Silva");
  assert_eq!(fetched.created_at, created.created_at);
  assert!(fetched.updated_at.is_some());
}

#[tokio::test]
async fn update_of_missing_id_returns_false_and_changes_nothing() {
  let s = store().await;
  let ana = signed_up(&s, "ana@example.com").await;
  s.create(&ana, maria()).await.unwrap();
  let before: Vec<Record<Client>> = s.list(&ana).await.unwrap();

  let patch = ClientPatch { name: Some("Ghost".into()), ..Default::default() };
  assert!(!s.update::<Client>(&ana, Uuid::new_v4(), patch).await.unwrap());

  let after: Vec<Record<Client>> = s.list(&ana).await.unwrap();
  assert_eq!(before, after);
}

#[tokio::test]
async fn delete_then_get_by_id_is_not_found() {
  let s = store().await;
  let ana = signed_up(&s, "ana@example.com").await;
  let created = s.create(&ana, maria()).await.unwrap();

  assert!(s.delete::<Client>(&ana, created.id).await.unwrap());
  assert!(s.get_by_id::<Client>(&ana, created.id).await.unwrap().is_none());
  assert!(!s.delete::<Client>(&ana, created.id).await.unwrap());
}

#[tokio::test]
async fn list_is_scoped_to_owner() {
  let s = store().await;
  let ana = signed_up(&s, "ana@example.com").await;
  for name in ["Maria", "João", "Carla"] {
    s.create(&ana, Client::new(name, "x@example.com", "1")).await.unwrap();
  }

  let bia = signed_up(&s, "bia@example.com").await;
  let bia_clients: Vec<Record<Client>> = s.list(&bia).await.unwrap();
  assert!(bia_clients.is_empty());

  let ana_clients: Vec<Record<Client>> = s.list(&ana).await.unwrap();
  assert_eq!(ana_clients.len(), 3);
  assert!(ana_clients.iter().all(|c| c.user_id == ana.id));
  assert_eq!(ana_clients[0].data.name, "Maria");
  assert_eq!(ana_clients[2].data.name, "Carla");
}

#[tokio::test]
async fn other_owners_cannot_read_update_or_delete() {
  let s = store().await;
  let ana = signed_up(&s, "ana@example.com").await;
  let bia = signed_up(&s, "bia@example.com").await;
  let created = s.create(&ana, maria()).await.unwrap();

  assert!(s.get_by_id::<Client>(&bia, created.id).await.unwrap().is_none());
  let patch = ClientPatch { name: Some("Hijack".into()), ..Default::default() };
  assert!(!s.update::<Client>(&bia, created.id, patch).await.unwrap());
  assert!(!s.delete::<Client>(&bia, created.id).await.unwrap());

  let still: Record<Client> = s.get_by_id(&ana, created.id).await.unwrap().unwrap();
  assert_eq!(still.data.name, "Maria Silva");
}

#[tokio::test]
async fn event_total_is_guests_times_value() {
  let s = store().await;
  let ana = signed_up(&s, "ana@example.com").await;

  let mut event = Event::new("Casamento", wedding_date());
  event.guest_count = 100;
  event.value_per_guest = "50.00".parse().unwrap();
  let created = s.create(&ana, event).await.unwrap();

  let fetched: Record<Event> = s.get_by_id(&ana, created.id).await.unwrap().unwrap();
  assert_eq!(fetched.data.total_value(), Money::from_cents(500_000));
}

#[tokio::test]
async fn checklist_survives_persistence() {
  let s = store().await;
  let ana = signed_up(&s, "ana@example.com").await;
  let created = s.create(&ana, Event::new("Formatura", wedding_date())).await.unwrap();

  let mut event = created.data.clone();
  let item = event.add_checklist_item("Reservar salão");
  event.toggle_checklist_item(item);
  let patch = EventPatch { checklist: Some(event.checklist), ..Default::default() };
  assert!(s.update::<Event>(&ana, created.id, patch).await.unwrap());

  let finalize = EventPatch { status: Some(EventStatus::Completed), ..Default::default() };
  assert!(s.update::<Event>(&ana, created.id, finalize).await.unwrap());

  let fetched: Record<Event> = s.get_by_id(&ana, created.id).await.unwrap().unwrap();
  assert_eq!(fetched.data.checklist.len(), 1);
  assert_eq!(fetched.data.progress(), 100);
  assert!(fetched.data.is_completed());
}

#[tokio::test]
async fn deleting_client_unlinks_events() {
  let s = store().await;
  let ana = signed_up(&s, "ana@example.com").await;
  let client = s.create(&ana, maria()).await.unwrap();
  let event = Event::new("Casamento", wedding_date()).with_client(client.id, Some(&client.data));
  let event = s.create(&ana, event).await.unwrap();

  assert!(s.delete::<Client>(&ana, client.id).await.unwrap());

  let fetched: Record<Event> = s.get_by_id(&ana, event.id).await.unwrap().unwrap();
  assert_eq!(fetched.data.client_id, None);
  assert_eq!(fetched.data.client_name, "Maria Silva");
}

#[tokio::test]
async fn deleting_vendor_detaches_it_from_events() {
  let s = store().await;
  let ana = signed_up(&s, "ana@example.com").await;
  let buffet = s.create(&ana, Vendor::new("Buffet Real", "Buffet", "x")).await.unwrap();
  let flores = s.create(&ana, Vendor::new("Flores", "Decoração", "y")).await.unwrap();

  let mut event = Event::new("Casamento", wedding_date());
  event.vendor_ids.extend([buffet.id, flores.id]);
  let event = s.create(&ana, event).await.unwrap();

  assert!(s.delete::<Vendor>(&ana, buffet.id).await.unwrap());

  let fetched: Record<Event> = s.get_by_id(&ana, event.id).await.unwrap().unwrap();
  assert_eq!(fetched.data.vendor_ids.len(), 1);
  assert!(fetched.data.vendor_ids.contains(&flores.id));
}

#[tokio::test]
async fn update_can_clear_time_and_vendors() {
  let s = store().await;
  let ana = signed_up(&s, "ana@example.com").await;
  let buffet = s.create(&ana, Vendor::new("Buffet Real", "Buffet", "x")).await.unwrap();

  let mut event = Event::new("Casamento", wedding_date());
  event.time = NaiveTime::from_hms_opt(10, 0, 0);
  event.vendor_ids.insert(buffet.id);
  let event = s.create(&ana, event).await.unwrap();

  let rename = EventPatch { title: Some("Bodas".into()), ..Default::default() };
  assert!(s.update::<Event>(&ana, event.id, rename).await.unwrap());
  let kept: Record<Event> = s.get_by_id(&ana, event.id).await.unwrap().unwrap();
  assert_eq!(kept.data.time, NaiveTime::from_hms_opt(10, 0, 0));
  assert!(kept.data.vendor_ids.contains(&buffet.id));

  let clear = EventPatch {
    time: Some(None),
    vendor_ids: Some(BTreeSet::new()),
    ..Default::default()
  };
  assert!(s.update::<Event>(&ana, event.id, clear).await.unwrap());
  let cleared: Record<Event> = s.get_by_id(&ana, event.id).await.unwrap().unwrap();
  assert_eq!(cleared.data.time, None);
  assert!(cleared.data.vendor_ids.is_empty());
  assert_eq!(cleared.data.title, "Bodas");
}

#[tokio::test]
async fn restore_keeps_id_and_timestamps_but_retags_owner() {
  let s = store().await;
  let ana = signed_up(&s, "ana@example.com").await;
  let created_at = "2024-05-01T12:00:00Z".parse().unwrap();

  let record = Record {
    id: Uuid::new_v4(),
    user_id: Uuid::new_v4(),
    created_at,
    updated_at: None,
    data: maria(),
  };
  s.restore(&ana, record.clone()).await.unwrap();

  let fetched: Record<Client> = s.get_by_id(&ana, record.id).await.unwrap().unwrap();
  assert_eq!(fetched.user_id, ana.id);
  assert_eq!(fetched.created_at, created_at);
}

#[tokio::test]
async fn clear_removes_only_the_owners_data() {
  let s = store().await;
  let ana = signed_up(&s, "ana@example.com").await;
  let bia = signed_up(&s, "bia@example.com").await;

  s.create(&ana, maria()).await.unwrap();
  s.create(&ana, Event::new("Casamento", wedding_date())).await.unwrap();
  s.create(&ana, Vendor::new("Som", "Música", "z")).await.unwrap();
  let branding = Branding::from_parts(Some("Ana Eventos".into()), None, None);
  s.save_branding(&ana, branding).await.unwrap();
  s.create(&bia, maria()).await.unwrap();

  s.clear(&ana).await.unwrap();

  assert!(s.list::<Client>(&ana).await.unwrap().is_empty());
  assert!(s.list::<Event>(&ana).await.unwrap().is_empty());
  assert!(s.list::<Vendor>(&ana).await.unwrap().is_empty());
  assert_eq!(s.branding(&ana).await.unwrap().label, DEFAULT_BRAND_LABEL);
  assert_eq!(s.list::<Client>(&bia).await.unwrap().len(), 1);
}

// ─── Branding ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn branding_defaults_then_saves() {
  let s = store().await;
  let ana = signed_up(&s, "ana@example.com").await;
  assert_eq!(s.branding(&ana).await.unwrap(), Branding::default());

  let custom = Branding {
    label:         "Ana Eventos".into(),
    primary_color: Some("#8B5CF6".into()),
    logo:          Some("/tmp/logo.png".into()),
  };
  s.save_branding(&ana, custom.clone()).await.unwrap();
  assert_eq!(s.branding(&ana).await.unwrap(), custom);

  let relabel = Branding { label: "Ana & Cia".into(), ..custom };
  s.save_branding(&ana, relabel.clone()).await.unwrap();
  assert_eq!(s.branding(&ana).await.unwrap(), relabel);
}
