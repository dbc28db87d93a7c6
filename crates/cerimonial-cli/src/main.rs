//! `cerimonial`: command-line front end for the event planner.
//!
//! # Usage
//!
//! ```text
//! cerimonial signup --email ana@example.com --name "Ana"
//! cerimonial client add --name "Maria Silva" --email maria@example.com --phone "11 99999-0000"
//! cerimonial event add --title Casamento --date 14/11/2026 --client <ID> --guests 100 --value-per-guest 50,00
//! cerimonial report event <ID>
//! ```
//!
//! Data lives in one SQLite file, `~/.cerimonial/cerimonial.db` unless
//! `store_path` is set in `cerimonial.toml`, in `CERIMONIAL_STORE_PATH`, or
//! with `--store`.

mod app;
mod args;
mod import;
mod settings;
mod ui;

use anyhow::Context as _;
use app::App;
use args::{Cli, Entry};
use cerimonial_core::password::hash_password;
use cerimonial_store_sqlite::SqliteStore;
use clap::Parser;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so views on stdout stay clean.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let command = match cli.command {
    Entry::HashPassword => return print_password_hash(),
    Entry::Run(command) => command,
  };

  let settings = Settings::load(&cli.config, cli.store.as_deref())?;
  if let Some(parent) = settings.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;
  tracing::debug!(path = %settings.store_path.display(), "store opened");

  App::new(store).run(command).await
}

/// Read a password from stdin and print its argon2 PHC string.
fn print_password_hash() -> anyhow::Result<()> {
  let password = prompt("Senha: ")?;
  println!("{}", hash_password(&password)?);
  Ok(())
}

/// Print `label` and read one line from stdin, without the line ending.
fn prompt(label: &str) -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("{label}");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
