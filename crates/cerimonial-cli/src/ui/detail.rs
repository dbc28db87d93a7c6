//! Single-record views: a client with its events, an event with its
//! checklist and vendors, a vendor with its catalog.

use std::fmt::{self, Display};

use cerimonial_core::{Record, client::Client, event::Event, vendor::Vendor};

use super::{Progress, heading, when};

pub struct ClientDetail<'a> {
  pub client: &'a Record<Client>,
  /// Every event referencing the client.
  pub events: &'a [&'a Record<Event>],
}

impl Display for ClientDetail<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let c = &self.client.data;
    heading(f, &c.name)?;
    writeln!(f, "ID:       {}", self.client.id)?;
    writeln!(f, "E-mail:   {}", c.email)?;
    writeln!(f, "Telefone: {}", c.phone)?;
    writeln!(f, "Contrato: {}", if c.contract.is_some() { "salvo" } else { "não preenchido" })?;
    writeln!(f)?;

    heading(f, "Eventos")?;
    if self.events.is_empty() {
      return writeln!(f, "Nenhum evento registrado.");
    }
    for r in self.events {
      let e = &r.data;
      writeln!(f, "{}  {}  {}  {}", r.id, when(e.date, e.time), e.title, e.status)?;
    }
    Ok(())
  }
}

pub struct EventDetail<'a> {
  pub event:   &'a Record<Event>,
  pub vendors: &'a [Record<Vendor>],
}

impl Display for EventDetail<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let e = &self.event.data;
    heading(f, &e.title)?;
    writeln!(f, "ID:        {}", self.event.id)?;
    writeln!(f, "Cliente:   {}", e.client_name)?;
    writeln!(f, "Data:      {}", when(e.date, e.time))?;
    writeln!(f, "Status:    {}", e.status)?;
    writeln!(f, "Convidados {} × {} = {}", e.guest_count, e.value_per_guest, e.total_value())?;
    writeln!(f)?;

    let (done, total) = e.checklist_counts();
    heading(f, &format!("Checklist {done}/{total} {}", Progress(e.progress())))?;
    for item in &e.checklist {
      let mark = if item.completed { "x" } else { " " };
      writeln!(f, "[{mark}] {}  {}", item.id, item.text)?;
    }
    writeln!(f)?;

    heading(f, "Fornecedores")?;
    let linked: Vec<&Record<Vendor>> =
      self.vendors.iter().filter(|v| e.vendor_ids.contains(&v.id)).collect();
    if linked.is_empty() {
      return writeln!(f, "Nenhum fornecedor vinculado.");
    }
    for v in linked {
      writeln!(f, "{}  {} [{}]", v.id, v.data.name, v.data.category)?;
    }
    Ok(())
  }
}

pub struct VendorDetail<'a>(pub &'a Record<Vendor>);

impl Display for VendorDetail<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let v = &self.0.data;
    heading(f, &v.name)?;
    writeln!(f, "ID:        {}", self.0.id)?;
    writeln!(f, "Categoria: {}", v.category)?;
    writeln!(f, "Contato:   {}", v.contact)?;
    writeln!(f)?;

    heading(f, "Produtos")?;
    if v.products.is_empty() {
      return writeln!(f, "Nenhum produto cadastrado.");
    }
    for p in &v.products {
      writeln!(f, "{}  {}  {} × {} = {}", p.id, p.name, p.quantity, p.price, p.total)?;
    }
    writeln!(f, "Total do catálogo: {}", v.catalog_total())
  }
}
