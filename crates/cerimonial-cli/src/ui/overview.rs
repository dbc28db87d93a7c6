//! The dashboard and the cross-list search view.

use std::fmt::{self, Display};

use cerimonial_core::{dashboard::Dashboard, search::SearchResults};

use super::{ClientList, EventList, Progress, VendorList, heading, when};

pub struct DashboardView<'a> {
  pub greeting:  &'a str,
  pub dashboard: &'a Dashboard,
}

impl Display for DashboardView<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let d = self.dashboard;
    heading(f, &format!("Olá, {}", self.greeting))?;
    writeln!(f, "Clientes:       {}", d.clients)?;
    writeln!(
      f,
      "Eventos:        {} ({} agendados, {} finalizados)",
      d.events, d.scheduled, d.completed
    )?;
    writeln!(f, "Fornecedores:   {}", d.vendors)?;
    writeln!(f, "Progresso geral {}", Progress(d.average_progress))?;
    writeln!(f)?;

    heading(f, "Eventos na Agenda")?;
    if d.upcoming.is_empty() {
      return writeln!(f, "Nenhum evento agendado.");
    }
    for e in &d.upcoming {
      writeln!(
        f,
        "{}  {}  {} ({})  {}",
        e.id,
        when(e.date, e.time),
        e.title,
        e.client_name,
        Progress(e.progress)
      )?;
    }
    Ok(())
  }
}

pub struct SearchView<'a> {
  pub query:   &'a str,
  pub results: &'a SearchResults,
}

impl Display for SearchView<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let r = self.results;
    if r.is_empty() {
      return writeln!(f, "Nenhum resultado para \"{}\".", self.query);
    }
    if !r.clients.is_empty() {
      writeln!(f, "{}", ClientList(&r.clients))?;
    }
    if !r.events.is_empty() {
      writeln!(f, "{}", EventList(&r.events))?;
    }
    if !r.vendors.is_empty() {
      write!(f, "{}", VendorList(&r.vendors))?;
    }
    Ok(())
  }
}
