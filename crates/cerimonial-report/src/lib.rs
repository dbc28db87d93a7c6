//! Printable plain-text reports for Cerimonial.
//!
//! Renders client lists, agendas, per-client and per-event reports and
//! contract documents from [`cerimonial_core`] records. Pure synchronous; no
//! database or terminal dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use cerimonial_core::branding::Branding;
//! use cerimonial_report::{Letterhead, client_list};
//!
//! let branding = Branding::default();
//! let text = client_list(&Letterhead::today(&branding), &[]).unwrap();
//! print!("{text}");
//! ```

pub mod error;
mod render;
mod table;

use cerimonial_core::{Record, branding::Branding, client::Client, event::Event, vendor::Vendor};
use chrono::NaiveDate;
pub use error::{Error, Result};

// ─── Public types ────────────────────────────────────────────────────────────

/// What every report header carries besides its title.
#[derive(Debug, Clone, Copy)]
pub struct Letterhead<'a> {
  pub branding:     &'a Branding,
  /// Printed as `Gerado em: dd/mm/yyyy`.
  pub generated_on: NaiveDate,
}

impl<'a> Letterhead<'a> {
  pub fn new(branding: &'a Branding, generated_on: NaiveDate) -> Self {
    Self { branding, generated_on }
  }

  /// A letterhead dated with the local calendar day.
  pub fn today(branding: &'a Branding) -> Self {
    Self::new(branding, chrono::Local::now().date_naive())
  }
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Name, email and phone of every client.
pub fn client_list(head: &Letterhead<'_>, clients: &[Record<Client>]) -> Result<String> {
  render::client_list(head, clients)
}

/// Date, title and client of every event, in the order given.
pub fn agenda(head: &Letterhead<'_>, events: &[Record<Event>]) -> Result<String> {
  render::agenda(head, "Relatório de Agenda", events.iter())
}

/// Like [`agenda`], restricted to completed events.
pub fn completed_agenda(head: &Letterhead<'_>, events: &[Record<Event>]) -> Result<String> {
  render::agenda(
    head,
    "Relatório de Eventos Finalizados",
    events.iter().filter(|e| e.data.is_completed()),
  )
}

/// Contact data and event history of one client.
///
/// `events` may hold every event of the owner; only those referencing
/// `client` are listed.
pub fn client_report(
  head: &Letterhead<'_>,
  client: &Record<Client>,
  events: &[Record<Event>],
) -> Result<String> {
  render::client_report(head, client, events)
}

/// Figures, checklist and linked vendors of one event.
///
/// Vendor ids on the event with no match in `vendors` are skipped.
pub fn event_report(
  head: &Letterhead<'_>,
  event: &Record<Event>,
  vendors: &[Record<Vendor>],
) -> Result<String> {
  render::event_report(head, event, vendors)
}

/// The client's saved contract, or a placeholder line when none was saved.
pub fn contract_document(head: &Letterhead<'_>, client: &Client) -> Result<String> {
  render::contract_document(head, client)
}
