//! Command dispatcher.
//!
//! Every handler restores the session, calls the stores with the signed-in
//! identity as the owner of each read and write, then prints the resulting
//! view.

use std::{collections::BTreeSet, path::Path};

use anyhow::{Context as _, Result, bail};
use cerimonial_core::{
  Entity, EntityKind, Identity, Record,
  branding::Branding,
  client::{Client, ClientPatch},
  contract,
  dashboard::Dashboard,
  event::{Event, EventPatch, client_display_name},
  search::SearchResults,
  store::{BrandingStore, CredentialStore, RecordStore, SessionStore},
  user::NewUser,
  vendor::{Vendor, VendorPatch},
};
use cerimonial_report::Letterhead;
use cerimonial_store_sqlite::{Error as StoreError, SqliteStore};
use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::{
  args::{
    BrandingCommand, ChecklistCommand, ClientCommand, Command, ContractCommand, EventClear,
    EventCommand, EventFields, ProductCommand, ReportCommand, VendorCommand,
  },
  import, prompt, ui,
};

pub struct App {
  store: SqliteStore,
}

impl App {
  pub fn new(store: SqliteStore) -> Self { Self { store } }

  pub async fn run(&self, command: Command) -> Result<()> {
    match command {
      Command::Signup { email, name, password } => self.signup(email, name, password).await,
      Command::Login { email, password } => self.login(email, password).await,
      Command::Logout => self.logout().await,
      Command::Whoami => self.whoami().await,
      Command::Dashboard => {
        let owner = self.owner().await?;
        self.dashboard(&owner).await
      }
      Command::Search { query } => self.search(&query).await,
      Command::Client(cmd) => self.client(cmd).await,
      Command::Event(cmd) => self.event(cmd).await,
      Command::Checklist(cmd) => self.checklist(cmd).await,
      Command::Vendor(cmd) => self.vendor(cmd).await,
      Command::Product(cmd) => self.product(cmd).await,
      Command::Contract(cmd) => self.contract(cmd).await,
      Command::Report(cmd) => self.report(cmd).await,
      Command::Branding(cmd) => self.branding(cmd).await,
      Command::ClearData { yes } => self.clear_data(yes).await,
      Command::Import { file } => import::run(&self.store, &file).await,
    }
  }

  // ── Session ───────────────────────────────────────────────────────────────

  /// The signed-in identity, or an error telling the user to log in.
  async fn owner(&self) -> Result<Identity> {
    self
      .store
      .restore_session()
      .await?
      .map(|session| session.identity)
      .context("nenhuma sessão ativa; entre com `cerimonial login`")
  }

  async fn signup(&self, email: String, name: String, password: Option<String>) -> Result<()> {
    let password = password_or_prompt(password)?;
    let identity = match self.store.register(NewUser { email, password, name }).await {
      Ok(identity) => identity,
      Err(StoreError::DuplicateEmail(_)) => bail!("Email já cadastrado."),
      Err(e) => return Err(e).context("falha ao criar a conta"),
    };
    self.store.start_session(identity.clone()).await?;
    println!("Conta criada para {}.\n", identity.email);
    self.dashboard(&identity).await
  }

  async fn login(&self, email: String, password: Option<String>) -> Result<()> {
    let password = password_or_prompt(password)?;
    let identity = match self.store.authenticate(&email, &password).await {
      Ok(identity) => identity,
      Err(StoreError::InvalidCredentials) => bail!("Email ou senha inválidos."),
      Err(e) => return Err(e).context("falha ao entrar"),
    };
    self.store.start_session(identity.clone()).await?;
    self.dashboard(&identity).await
  }

  async fn logout(&self) -> Result<()> {
    if self.store.end_session().await? {
      println!("Sessão encerrada.");
    }
    println!("Acesso ao Sistema: entre com `cerimonial login --email <EMAIL>`.");
    Ok(())
  }

  async fn whoami(&self) -> Result<()> {
    match self.store.restore_session().await? {
      Some(session) => println!(
        "{} <{}> desde {}",
        session.identity.name,
        session.identity.email,
        session.started_at.with_timezone(&Local).format("%d/%m/%Y %H:%M")
      ),
      None => println!("Nenhuma sessão ativa."),
    }
    Ok(())
  }

  // ── Overview ──────────────────────────────────────────────────────────────

  async fn dashboard(&self, owner: &Identity) -> Result<()> {
    let clients = self.store.list::<Client>(owner).await?;
    let events = self.store.list::<Event>(owner).await?;
    let vendors = self.store.list::<Vendor>(owner).await?;
    let dashboard = Dashboard::build(&clients, &events, &vendors);
    print!("{}", ui::DashboardView { greeting: &owner.name, dashboard: &dashboard });
    Ok(())
  }

  async fn search(&self, query: &str) -> Result<()> {
    let owner = self.owner().await?;
    let results = SearchResults::collect(
      query,
      self.store.list(&owner).await?,
      self.store.list(&owner).await?,
      self.store.list(&owner).await?,
    );
    print!("{}", ui::SearchView { query, results: &results });
    Ok(())
  }

  // ── Clients ───────────────────────────────────────────────────────────────

  async fn client(&self, cmd: ClientCommand) -> Result<()> {
    let owner = self.owner().await?;
    match cmd {
      ClientCommand::List => {
        let clients = self.store.list::<Client>(&owner).await?;
        print!("{}", ui::ClientList(&clients));
      }
      ClientCommand::Add { name, email, phone } => {
        let record = self.store.create(&owner, Client::new(name, email, phone)).await?;
        println!("Cliente salvo: {}", record.id);
      }
      ClientCommand::Edit { id, name, email, phone } => {
        self
          .patch::<Client>(&owner, id, ClientPatch { name, email, phone, contract: None })
          .await?;
        println!("Cliente atualizado.");
      }
      ClientCommand::Delete { id } => {
        self.remove::<Client>(&owner, id).await?;
        println!("Cliente excluído.");
      }
      ClientCommand::Show { id } => {
        let client = self.fetch::<Client>(&owner, id).await?;
        let events = self.store.list::<Event>(&owner).await?;
        let theirs: Vec<&Record<Event>> =
          events.iter().filter(|e| e.data.client_id == Some(id)).collect();
        print!("{}", ui::ClientDetail { client: &client, events: &theirs });
      }
    }
    Ok(())
  }

  // ── Events ────────────────────────────────────────────────────────────────

  async fn event(&self, cmd: EventCommand) -> Result<()> {
    let owner = self.owner().await?;
    match cmd {
      EventCommand::List { completed } => {
        let mut events = self.store.list::<Event>(&owner).await?;
        if completed {
          events.retain(|e| e.data.is_completed());
        }
        print!("{}", ui::EventList(&events));
      }
      EventCommand::Add { fields } => {
        let event = self.new_event(&owner, fields).await?;
        let record = self.store.create(&owner, event).await?;
        println!("Evento salvo: {}", record.id);
      }
      EventCommand::Edit { id, fields, clear } => {
        let patch = self.event_patch(&owner, fields, clear).await?;
        self.patch::<Event>(&owner, id, patch).await?;
        println!("Evento atualizado.");
      }
      EventCommand::Delete { id } => {
        self.remove::<Event>(&owner, id).await?;
        println!("Evento excluído.");
      }
      EventCommand::Show { id } => {
        let event = self.fetch::<Event>(&owner, id).await?;
        let vendors = self.store.list::<Vendor>(&owner).await?;
        print!("{}", ui::EventDetail { event: &event, vendors: &vendors });
      }
      EventCommand::Finalize { id } => {
        let mut event = self.fetch::<Event>(&owner, id).await?.data;
        event.finalize();
        let patch = EventPatch { status: Some(event.status), ..Default::default() };
        self.patch::<Event>(&owner, id, patch).await?;
        println!("Evento \"{}\" marcado como {}.", event.title, event.status);
      }
    }
    Ok(())
  }

  async fn new_event(&self, owner: &Identity, fields: EventFields) -> Result<Event> {
    let title = fields.title.filter(|t| !t.trim().is_empty()).context("--title é obrigatório")?;
    let date = fields.date.context("--date é obrigatório")?;

    let mut event = Event::new(title, date);
    if let Some(client_id) = fields.client {
      let client = self.store.get_by_id::<Client>(owner, client_id).await?;
      event = event.with_client(client_id, client.as_ref().map(|c| &c.data));
    }
    event.time = fields.time;
    event.guest_count = fields.guests.unwrap_or_default();
    event.value_per_guest = fields.value_per_guest.unwrap_or_default();
    event.vendor_ids = self.vendor_set(owner, fields.vendors).await?;
    Ok(event)
  }

  async fn event_patch(
    &self,
    owner: &Identity,
    fields: EventFields,
    clear: EventClear,
  ) -> Result<EventPatch> {
    let mut patch = EventPatch {
      title: fields.title,
      date: fields.date,
      time: if clear.no_time { Some(None) } else { fields.time.map(Some) },
      guest_count: fields.guests,
      value_per_guest: fields.value_per_guest,
      ..Default::default()
    };
    if let Some(client_id) = fields.client {
      let client = self.store.get_by_id::<Client>(owner, client_id).await?;
      patch.client_id = Some(Some(client_id));
      patch.client_name = Some(client_display_name(client.as_ref().map(|c| &c.data)));
    } else if clear.no_client {
      patch.client_id = Some(None);
    }
    if clear.no_vendors {
      patch.vendor_ids = Some(BTreeSet::new());
    } else if !fields.vendors.is_empty() {
      patch.vendor_ids = Some(self.vendor_set(owner, fields.vendors).await?);
    }
    Ok(patch)
  }

  /// Every id must name one of the owner's vendors.
  async fn vendor_set(&self, owner: &Identity, ids: Vec<Uuid>) -> Result<BTreeSet<Uuid>> {
    for id in &ids {
      self.fetch::<Vendor>(owner, *id).await?;
    }
    Ok(ids.into_iter().collect())
  }

  async fn checklist(&self, cmd: ChecklistCommand) -> Result<()> {
    let owner = self.owner().await?;
    let event_id = match &cmd {
      ChecklistCommand::Add { event, .. }
      | ChecklistCommand::Toggle { event, .. }
      | ChecklistCommand::Remove { event, .. } => *event,
    };
    let mut event = self.fetch::<Event>(&owner, event_id).await?.data;

    match cmd {
      ChecklistCommand::Add { text, .. } => {
        let id = event.add_checklist_item(text);
        println!("Tarefa adicionada: {id}");
      }
      ChecklistCommand::Toggle { item, .. } => {
        let done = event.toggle_checklist_item(item).context("tarefa não encontrada")?;
        println!("Tarefa {}.", if done { "concluída" } else { "reaberta" });
      }
      ChecklistCommand::Remove { item, .. } => {
        if !event.remove_checklist_item(item) {
          bail!("tarefa não encontrada");
        }
        println!("Tarefa removida.");
      }
    }

    let progress = event.progress();
    let patch = EventPatch { checklist: Some(event.checklist), ..Default::default() };
    self.patch::<Event>(&owner, event_id, patch).await?;
    println!("Progresso: {}", ui::Progress(progress));
    Ok(())
  }

  // ── Vendors ───────────────────────────────────────────────────────────────

  async fn vendor(&self, cmd: VendorCommand) -> Result<()> {
    let owner = self.owner().await?;
    match cmd {
      VendorCommand::List => {
        let vendors = self.store.list::<Vendor>(&owner).await?;
        print!("{}", ui::VendorList(&vendors));
      }
      VendorCommand::Add { name, category, contact } => {
        let record = self.store.create(&owner, Vendor::new(name, category, contact)).await?;
        println!("Fornecedor salvo: {}", record.id);
      }
      VendorCommand::Edit { id, name, category, contact } => {
        self
          .patch::<Vendor>(&owner, id, VendorPatch { name, category, contact, products: None })
          .await?;
        println!("Fornecedor atualizado.");
      }
      VendorCommand::Delete { id } => {
        self.remove::<Vendor>(&owner, id).await?;
        println!("Fornecedor excluído.");
      }
      VendorCommand::Show { id } => {
        let vendor = self.fetch::<Vendor>(&owner, id).await?;
        print!("{}", ui::VendorDetail(&vendor));
      }
    }
    Ok(())
  }

  async fn product(&self, cmd: ProductCommand) -> Result<()> {
    let owner = self.owner().await?;
    let vendor_id = match &cmd {
      ProductCommand::Add { vendor, .. } | ProductCommand::Remove { vendor, .. } => *vendor,
    };
    let mut vendor = self.fetch::<Vendor>(&owner, vendor_id).await?.data;

    match cmd {
      ProductCommand::Add { name, quantity, price, .. } => {
        let product = vendor.add_product(name, quantity, price);
        println!("Produto adicionado: {} ({})", product.id, product.total);
      }
      ProductCommand::Remove { product, .. } => {
        if !vendor.remove_product(product) {
          bail!("produto não encontrado");
        }
        println!("Produto removido.");
      }
    }

    let total = vendor.catalog_total();
    let patch = VendorPatch { products: Some(vendor.products), ..Default::default() };
    self.patch::<Vendor>(&owner, vendor_id, patch).await?;
    println!("Total do catálogo: {total}");
    Ok(())
  }

  // ── Documents ─────────────────────────────────────────────────────────────

  async fn contract(&self, cmd: ContractCommand) -> Result<()> {
    let owner = self.owner().await?;
    match cmd {
      ContractCommand::Show { client } => {
        let client = self.fetch::<Client>(&owner, client).await?;
        println!("{}", contract::editable_text(&client.data, today()));
      }
      ContractCommand::Edit { client, file, reset } => {
        let record = self.fetch::<Client>(&owner, client).await?;
        let text = contract_source(&record.data, file.as_deref(), reset, today())?;
        let patch = ClientPatch { contract: Some(text), ..Default::default() };
        self.patch::<Client>(&owner, client, patch).await?;
        println!("Contrato salvo.");
      }
      ContractCommand::Print { client } => {
        let client = self.fetch::<Client>(&owner, client).await?;
        let branding = self.store.branding(&owner).await?;
        print!(
          "{}",
          cerimonial_report::contract_document(&Letterhead::today(&branding), &client.data)?
        );
      }
    }
    Ok(())
  }

  async fn report(&self, cmd: ReportCommand) -> Result<()> {
    let owner = self.owner().await?;
    let branding = self.store.branding(&owner).await?;
    let head = Letterhead::today(&branding);

    let text = match cmd {
      ReportCommand::Clients => {
        let clients = self.store.list::<Client>(&owner).await?;
        cerimonial_report::client_list(&head, &clients)?
      }
      ReportCommand::Agenda { completed } => {
        let events = self.store.list::<Event>(&owner).await?;
        if completed {
          cerimonial_report::completed_agenda(&head, &events)?
        } else {
          cerimonial_report::agenda(&head, &events)?
        }
      }
      ReportCommand::Client { id } => {
        let client = self.fetch::<Client>(&owner, id).await?;
        let events = self.store.list::<Event>(&owner).await?;
        cerimonial_report::client_report(&head, &client, &events)?
      }
      ReportCommand::Event { id } => {
        let event = self.fetch::<Event>(&owner, id).await?;
        let vendors = self.store.list::<Vendor>(&owner).await?;
        cerimonial_report::event_report(&head, &event, &vendors)?
      }
    };
    print!("{text}");
    Ok(())
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  async fn branding(&self, cmd: BrandingCommand) -> Result<()> {
    let owner = self.owner().await?;
    let current = self.store.branding(&owner).await?;
    let branding = match cmd {
      BrandingCommand::Show => current,
      BrandingCommand::Set { label, color, logo } => {
        let updated = Branding::from_parts(
          label.or(Some(current.label)),
          color.or(current.primary_color),
          logo.or(current.logo),
        );
        self.store.save_branding(&owner, updated.clone()).await?;
        println!("Configurações atualizadas!");
        updated
      }
    };
    println!("Marca: {}", branding.label);
    println!("Cor:   {}", branding.primary_color.as_deref().unwrap_or("-"));
    println!("Logo:  {}", branding.logo.as_deref().unwrap_or("-"));
    Ok(())
  }

  async fn clear_data(&self, yes: bool) -> Result<()> {
    let owner = self.owner().await?;
    if !yes {
      let answer = prompt("CUIDADO: Isso apagará SEUS dados permanentemente. Continuar? [s/N] ")?;
      if !matches!(answer.trim().to_lowercase().as_str(), "s" | "sim") {
        println!("Cancelado.");
        return Ok(());
      }
    }
    self.store.clear(&owner).await?;
    println!("Dados de {} apagados.", owner.email);
    Ok(())
  }

  // ── Record helpers ────────────────────────────────────────────────────────

  async fn fetch<T: Entity>(&self, owner: &Identity, id: Uuid) -> Result<Record<T>> {
    self
      .store
      .get_by_id::<T>(owner, id)
      .await?
      .with_context(|| format!("{} não encontrado: {id}", noun(T::KIND)))
  }

  async fn patch<T: Entity>(&self, owner: &Identity, id: Uuid, patch: T::Patch) -> Result<()> {
    if !self.store.update::<T>(owner, id, patch).await? {
      bail!("{} não encontrado: {id}", noun(T::KIND));
    }
    Ok(())
  }

  async fn remove<T: Entity>(&self, owner: &Identity, id: Uuid) -> Result<()> {
    if !self.store.delete::<T>(owner, id).await? {
      bail!("{} não encontrado: {id}", noun(T::KIND));
    }
    Ok(())
  }
}

fn noun(kind: EntityKind) -> &'static str {
  match kind {
    EntityKind::Clients => "cliente",
    EntityKind::Events => "evento",
    EntityKind::Vendors => "fornecedor",
  }
}

fn today() -> NaiveDate { Local::now().date_naive() }

/// Text `contract edit` saves: FILE when given, otherwise the editor's
/// starting text, which keeps a saved contract unless `reset` is set.
fn contract_source(
  client: &Client,
  file: Option<&Path>,
  reset: bool,
  today: NaiveDate,
) -> Result<String> {
  match file {
    Some(path) => {
      std::fs::read_to_string(path).with_context(|| format!("falha ao ler {}", path.display()))
    }
    None if reset => Ok(contract::draft(&client.name, today)),
    None => Ok(contract::editable_text(client, today)),
  }
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
  let password = match password {
    Some(password) => password,
    None => prompt("Senha: ")?,
  };
  if password.is_empty() {
    bail!("a senha não pode ser vazia");
  }
  Ok(password)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn march_9() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 3, 9).unwrap() }

  #[test]
  fn contract_edit_without_file_keeps_saved_text() {
    let mut maria = Client::new("Maria Silva", "maria@example.com", "1");
    let fresh = contract_source(&maria, None, false, march_9()).unwrap();
    assert!(fresh.contains("Maria Silva"));
    assert!(fresh.contains("09/03/2026"));

    maria.contract = Some("Cláusula única: festa até as 2h.".to_owned());
    let kept = contract_source(&maria, None, false, march_9()).unwrap();
    assert_eq!(kept, "Cláusula única: festa até as 2h.");

    let reset = contract_source(&maria, None, true, march_9()).unwrap();
    assert_eq!(reset, contract::draft("Maria Silva", march_9()));
  }

  #[test]
  fn contract_edit_reads_file() {
    let path = std::env::temp_dir().join(format!("contrato-{}.txt", Uuid::new_v4()));
    std::fs::write(&path, "Texto do arquivo").unwrap();
    let maria = Client::new("Maria Silva", "maria@example.com", "1");
    let text = contract_source(&maria, Some(path.as_path()), false, march_9()).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(text, "Texto do arquivo");
  }
}
