//! Command-line surface.

use std::path::PathBuf;

use cerimonial_core::Money;
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "cerimonial", version, about = "Event planning for cerimonialistas")]
pub struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "cerimonial.toml")]
  pub config: PathBuf,

  /// Database file; overrides `store_path` from config and environment.
  #[arg(long, value_name = "PATH")]
  pub store: Option<PathBuf>,

  #[command(subcommand)]
  pub command: Entry,
}

/// Top-level commands: a store-free helper, or a command run against the
/// store.
#[derive(Subcommand, Debug)]
pub enum Entry {
  /// Print the argon2 hash for a password entered on stdin and exit.
  HashPassword,
  #[command(flatten)]
  Run(Command),
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Create an account and sign in.
  Signup {
    #[arg(long)]
    email:    String,
    #[arg(long)]
    name:     String,
    /// Read from stdin when omitted.
    #[arg(long)]
    password: Option<String>,
  },
  /// Sign in, replacing any active session.
  Login {
    #[arg(long)]
    email:    String,
    #[arg(long)]
    password: Option<String>,
  },
  /// End the active session.
  Logout,
  /// Show who is signed in.
  Whoami,
  /// Counts, upcoming events and overall checklist progress.
  Dashboard,
  /// Case-insensitive search across clients, events and vendors.
  Search { query: String },
  #[command(subcommand)]
  Client(ClientCommand),
  #[command(subcommand)]
  Event(EventCommand),
  /// Tasks on an event.
  #[command(subcommand)]
  Checklist(ChecklistCommand),
  #[command(subcommand)]
  Vendor(VendorCommand),
  /// Products in a vendor's catalog.
  #[command(subcommand)]
  Product(ProductCommand),
  /// Service contract attached to a client.
  #[command(subcommand)]
  Contract(ContractCommand),
  /// Printable reports.
  #[command(subcommand)]
  Report(ReportCommand),
  /// Label, colour and logo printed on report headers.
  #[command(subcommand)]
  Branding(BrandingCommand),
  /// Delete every client, event, vendor and branding setting of the signed-in user.
  ClearData {
    /// Skip the confirmation prompt.
    #[arg(long)]
    yes: bool,
  },
  /// Import a JSON dump of the browser version's local storage.
  Import { file: PathBuf },
}

// ─── Clients ─────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum ClientCommand {
  List,
  Add {
    #[arg(long)]
    name:  String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
  },
  Edit {
    id:    Uuid,
    #[arg(long)]
    name:  Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
  },
  Delete { id: Uuid },
  /// A client with every event referencing it.
  Show { id: Uuid },
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct EventFields {
  #[arg(long)]
  pub title:           Option<String>,
  /// `YYYY-MM-DD` or `DD/MM/YYYY`.
  #[arg(long, value_parser = parse_date)]
  pub date:            Option<NaiveDate>,
  /// `HH:MM`.
  #[arg(long, value_parser = parse_time)]
  pub time:            Option<NaiveTime>,
  /// Client id; the client's name is snapshotted on the event.
  #[arg(long)]
  pub client:          Option<Uuid>,
  #[arg(long)]
  pub guests:          Option<u32>,
  /// `50`, `50.00` or `50,00`.
  #[arg(long)]
  pub value_per_guest: Option<Money>,
  /// Linked vendor id; repeat for several. Replaces the current set on edit.
  #[arg(long = "vendor")]
  pub vendors:         Vec<Uuid>,
}

/// Fields `event edit` can empty.
#[derive(Args, Debug, Default)]
pub struct EventClear {
  /// Remove the client link, keeping the stored name.
  #[arg(long, conflicts_with = "client")]
  pub no_client:  bool,
  #[arg(long, conflicts_with = "time")]
  pub no_time:    bool,
  /// Unlink every vendor.
  #[arg(long, conflicts_with = "vendors")]
  pub no_vendors: bool,
}

#[derive(Subcommand, Debug)]
pub enum EventCommand {
  List {
    /// Only finalized events.
    #[arg(long)]
    completed: bool,
  },
  Add {
    #[command(flatten)]
    fields: EventFields,
  },
  Edit {
    id:     Uuid,
    #[command(flatten)]
    fields: EventFields,
    #[command(flatten)]
    clear:  EventClear,
  },
  Delete { id: Uuid },
  Show { id: Uuid },
  /// Mark the event as completed.
  Finalize { id: Uuid },
}

#[derive(Subcommand, Debug)]
pub enum ChecklistCommand {
  Add { event: Uuid, text: String },
  Toggle { event: Uuid, item: Uuid },
  Remove { event: Uuid, item: Uuid },
}

// ─── Vendors ─────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum VendorCommand {
  List,
  Add {
    #[arg(long)]
    name:     String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    contact:  String,
  },
  Edit {
    id:       Uuid,
    #[arg(long)]
    name:     Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    contact:  Option<String>,
  },
  Delete { id: Uuid },
  Show { id: Uuid },
}

#[derive(Subcommand, Debug)]
pub enum ProductCommand {
  Add {
    vendor:   Uuid,
    #[arg(long)]
    name:     String,
    /// Defaults to one unit.
    #[arg(long)]
    quantity: Option<f64>,
    #[arg(long)]
    price:    Money,
  },
  Remove { vendor: Uuid, product: Uuid },
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum ContractCommand {
  /// Print the text that would open in the editor.
  Show { client: Uuid },
  /// Save the contract text read from FILE. Without FILE, a client with no
  /// contract gets the template draft and a saved contract is kept.
  Edit {
    client: Uuid,
    #[arg(long, value_name = "FILE")]
    file:   Option<PathBuf>,
    /// Replace the saved contract with a fresh template draft.
    #[arg(long, conflicts_with = "file")]
    reset:  bool,
  },
  /// Render the printable contract document.
  Print { client: Uuid },
}

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
  Clients,
  Agenda {
    #[arg(long)]
    completed: bool,
  },
  Client { id: Uuid },
  Event { id: Uuid },
}

#[derive(Subcommand, Debug)]
pub enum BrandingCommand {
  Show,
  Set {
    #[arg(long)]
    label: Option<String>,
    #[arg(long)]
    color: Option<String>,
    /// Path or data URL of the logo image.
    #[arg(long)]
    logo:  Option<String>,
  },
}

// ─── Value parsers ───────────────────────────────────────────────────────────

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
    .map_err(|_| format!("invalid date {s:?}; use YYYY-MM-DD or DD/MM/YYYY"))
}

pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
  NaiveTime::parse_from_str(s, "%H:%M")
    .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
    .map_err(|_| format!("invalid time {s:?}; use HH:MM"))
}
