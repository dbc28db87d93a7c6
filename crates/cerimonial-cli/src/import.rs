//! `cerimonial import`: load a browser local-storage dump.

use std::path::Path;

use anyhow::{Context as _, Result};
use cerimonial_core::{
  legacy::{self, LegacyAccount},
  store::{BrandingStore, CredentialStore, RecordStore},
};
use cerimonial_store_sqlite::{Error as StoreError, SqliteStore};
use chrono::Utc;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
  pub users:        usize,
  pub clients:      usize,
  pub events:       usize,
  pub vendors:      usize,
  /// Emails of accounts left alone because they already exist.
  pub existing:     Vec<String>,
  pub skipped_rows: usize,
}

pub async fn run(store: &SqliteStore, file: &Path) -> Result<()> {
  let raw = std::fs::read_to_string(file)
    .with_context(|| format!("falha ao ler {}", file.display()))?;
  let summary = import_dump(store, &raw).await?;

  println!(
    "Importados: {} usuário(s), {} cliente(s), {} evento(s), {} fornecedor(es).",
    summary.users, summary.clients, summary.events, summary.vendors
  );
  for email in &summary.existing {
    println!("Ignorado (email já cadastrado): {email}");
  }
  if summary.skipped_rows > 0 {
    println!("{} registro(s) ignorado(s); detalhes com RUST_LOG=warn.", summary.skipped_rows);
  }
  Ok(())
}

pub async fn import_dump(store: &SqliteStore, raw: &str) -> Result<Summary> {
  let export = legacy::decode(raw, Utc::now()).context("arquivo de exportação inválido")?;

  let mut summary = Summary { skipped_rows: export.skipped.len(), ..Summary::default() };
  for note in &export.skipped {
    tracing::warn!(%note, "skipped legacy row");
  }

  for account in export.accounts {
    let email = account.user.email.clone();
    match import_account(store, account, &mut summary).await {
      Ok(()) => summary.users += 1,
      Err(StoreError::DuplicateEmail(_)) => {
        tracing::warn!(%email, "account already exists; skipping");
        summary.existing.push(email);
      }
      Err(e) => return Err(e).with_context(|| format!("falha ao importar {email}")),
    }
  }
  Ok(summary)
}

async fn import_account(
  store: &SqliteStore,
  account: LegacyAccount,
  summary: &mut Summary,
) -> Result<(), StoreError> {
  let owner = store.import_user(account.user).await?;

  summary.clients += account.clients.len();
  for record in account.clients {
    store.restore(&owner, record).await?;
  }
  summary.vendors += account.vendors.len();
  for record in account.vendors {
    store.restore(&owner, record).await?;
  }
  summary.events += account.events.len();
  for record in account.events {
    store.restore(&owner, record).await?;
  }
  if let Some(branding) = account.branding {
    store.save_branding(&owner, branding).await?;
  }

  tracing::info!(email = %owner.email, "imported legacy account");
  Ok(())
}

#[cfg(test)]
mod tests {
  use cerimonial_core::{
    Record, branding::Branding, client::Client, event::Event, password::legacy_digest,
    store::SessionStore,
  };
  use serde_json::json;

  use super::*;

  fn dump() -> String {
    let users = json!([
      { "id": "1", "email": "ana@example.com", "password": legacy_digest("antiga"), "name": "Ana" }
    ]);
    let clients = json!([
      { "id": "10", "userId": "1", "name": "Maria", "email": "m@example.com", "phone": "11" },
      { "id": "11", "userId": "2", "name": "Sem dono", "email": "", "phone": "" }
    ]);
    let events = json!([
      { "id": "20", "userId": "1", "title": "Casamento", "clientId": "10", "clientName": "Maria",
        "date": "2026-11-14", "guestCount": "100", "valuePerGuest": "50.00" }
    ]);
    json!({
      "cerimonial_db_users": users.to_string(),
      "cerimonial_db_clients": clients.to_string(),
      "cerimonial_db_events": events.to_string(),
      "cerimonial_db_vendors": "[]",
      "cerimonial_db_brand_label_1": "Ana Eventos"
    })
    .to_string()
  }

  #[tokio::test]
  async fn imports_accounts_and_their_records() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let summary = import_dump(&store, &dump()).await.unwrap();
    assert_eq!(
      summary,
      Summary { users: 1, clients: 1, events: 1, vendors: 0, existing: vec![], skipped_rows: 1 }
    );

    let ana = store.authenticate("ana@example.com", "antiga").await.unwrap();
    let clients: Vec<Record<Client>> = store.list(&ana).await.unwrap();
    let events: Vec<Record<Event>> = store.list(&ana).await.unwrap();
    assert_eq!(events[0].data.client_id, Some(clients[0].id));
    assert_eq!(store.branding(&ana).await.unwrap().label, "Ana Eventos");
    assert!(store.restore_session().await.unwrap().is_none());
  }

  #[tokio::test]
  async fn existing_accounts_are_left_alone() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    import_dump(&store, &dump()).await.unwrap();

    let again = import_dump(&store, &dump()).await.unwrap();
    assert_eq!(again.users, 0);
    assert_eq!(again.existing, vec!["ana@example.com".to_string()]);

    let ana = store.authenticate("ana@example.com", "antiga").await.unwrap();
    let clients: Vec<Record<Client>> = store.list(&ana).await.unwrap();
    assert_eq!(clients.len(), 1);
    assert_ne!(store.branding(&ana).await.unwrap(), Branding::default());
  }
}
