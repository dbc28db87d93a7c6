//! Report bodies. Each function writes a complete document into a `String`.

use std::fmt::Write;

use cerimonial_core::{
  Record,
  client::Client,
  contract::{format_date, printable_text},
  event::Event,
  vendor::Vendor,
};

use crate::{Letterhead, error::Result, table::Table};

const RULE_WIDTH: usize = 64;

// ─── Header ──────────────────────────────────────────────────────────────────

/// Title on the left, brand label on the right, then subtitle and date.
fn header(
  out: &mut String,
  head: &Letterhead<'_>,
  title: &str,
  subtitle: Option<&str>,
) -> Result<()> {
  let label = head.branding.label.as_str();
  let gap = RULE_WIDTH.saturating_sub(title.chars().count() + label.chars().count());
  if gap >= 2 {
    writeln!(out, "{title}{}{label}", " ".repeat(gap))?;
  } else {
    writeln!(out, "{title}")?;
    writeln!(out, "{label}")?;
  }
  if let Some(subtitle) = subtitle.filter(|s| !s.is_empty()) {
    writeln!(out, "{subtitle}")?;
  }
  writeln!(out, "Gerado em: {}", format_date(head.generated_on))?;
  writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
  writeln!(out)?;
  Ok(())
}

fn section(out: &mut String, title: &str) -> Result<()> {
  writeln!(out)?;
  writeln!(out, "{title}")?;
  Ok(())
}

fn date_time(event: &Event) -> String {
  match event.time {
    Some(time) => format!("{} às {}", format_date(event.date), time.format("%H:%M")),
    None => format_date(event.date),
  }
}

// ─── Listings ────────────────────────────────────────────────────────────────

pub(crate) fn client_list(head: &Letterhead<'_>, clients: &[Record<Client>]) -> Result<String> {
  let mut out = String::new();
  header(&mut out, head, "Lista de Clientes", None)?;

  let mut table =
    Table::new(&["Nome", "Email", "Telefone"]).when_empty("Nenhum cliente cadastrado.");
  for client in clients {
    let c = &client.data;
    table.row([c.name.as_str(), c.email.as_str(), c.phone.as_str()]);
  }
  table.write_to(&mut out)?;
  Ok(out)
}

pub(crate) fn agenda<'a>(
  head: &Letterhead<'_>,
  title: &str,
  events: impl Iterator<Item = &'a Record<Event>>,
) -> Result<String> {
  let mut out = String::new();
  header(&mut out, head, title, None)?;

  let mut table =
    Table::new(&["Data", "Título", "Cliente"]).when_empty("Nenhum evento encontrado.");
  for event in events {
    let e = &event.data;
    table.row([format_date(e.date), e.title.clone(), e.client_name.clone()]);
  }
  table.write_to(&mut out)?;
  Ok(out)
}

// ─── Individual reports ──────────────────────────────────────────────────────

pub(crate) fn client_report(
  head: &Letterhead<'_>,
  client: &Record<Client>,
  events: &[Record<Event>],
) -> Result<String> {
  let mut out = String::new();
  let c = &client.data;
  header(&mut out, head, "Relatório do Cliente", Some(&c.name))?;

  writeln!(out, "Dados de Contato")?;
  writeln!(out, "E-mail:   {}", c.email)?;
  writeln!(out, "Telefone: {}", c.phone)?;

  section(&mut out, "Histórico de Eventos")?;
  let mut table =
    Table::new(&["Data/Hora", "Evento", "Status"]).when_empty("Nenhum evento registrado.");
  for event in events.iter().filter(|e| e.data.client_id == Some(client.id)) {
    let e = &event.data;
    table.row([date_time(e), e.title.clone(), e.status.to_string()]);
  }
  table.write_to(&mut out)?;
  Ok(out)
}

pub(crate) fn event_report(
  head: &Letterhead<'_>,
  event: &Record<Event>,
  vendors: &[Record<Vendor>],
) -> Result<String> {
  let mut out = String::new();
  let e = &event.data;
  let subtitle = format!("Evento: {} | Cliente: {}", e.title, e.client_name);
  header(&mut out, head, "Relatório do Evento", Some(&subtitle))?;

  writeln!(out, "Data:                 {}", date_time(e))?;
  writeln!(out, "Total de Convidados:  {}", e.guest_count)?;
  writeln!(out, "Valor por Convidado:  {}", e.value_per_guest)?;
  writeln!(out, "Investimento Total:   {}", e.total_value())?;

  section(&mut out, "Checklist de Acompanhamento")?;
  let mut checklist = Table::new(&["Tarefa", "Status"]).when_empty("Nenhuma tarefa registrada.");
  for item in &e.checklist {
    let mark = if item.completed { "✅ Concluído" } else { "⏳ Pendente" };
    checklist.row([item.text.as_str(), mark]);
  }
  checklist.write_to(&mut out)?;

  section(&mut out, "Fornecedores Contratados")?;
  let mut linked =
    Table::new(&["Empresa", "Categoria", "Contato"]).when_empty("Nenhum fornecedor vinculado.");
  for vendor in vendors.iter().filter(|v| e.vendor_ids.contains(&v.id)) {
    let v = &vendor.data;
    linked.row([v.name.as_str(), v.category.as_str(), v.contact.as_str()]);
  }
  linked.write_to(&mut out)?;
  Ok(out)
}

pub(crate) fn contract_document(head: &Letterhead<'_>, client: &Client) -> Result<String> {
  let mut out = String::new();
  header(&mut out, head, "Contrato de Prestação de Serviços", None)?;
  writeln!(out, "{}", printable_text(client))?;
  Ok(out)
}
