//! One line per record, id first so it can be pasted into the next command.

use std::fmt::{self, Display};

use cerimonial_core::{Record, client::Client, event::Event, vendor::Vendor};

use super::{Progress, heading, when};

pub struct ClientList<'a>(pub &'a [Record<Client>]);

impl Display for ClientList<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    heading(f, &format!("Clientes ({})", self.0.len()))?;
    if self.0.is_empty() {
      return writeln!(f, "Nenhum cliente cadastrado.");
    }
    for r in self.0 {
      let c = &r.data;
      writeln!(f, "{}  {}  <{}>  {}", r.id, c.name, c.email, c.phone)?;
    }
    Ok(())
  }
}

pub struct EventList<'a>(pub &'a [Record<Event>]);

impl Display for EventList<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    heading(f, &format!("Eventos ({})", self.0.len()))?;
    if self.0.is_empty() {
      return writeln!(f, "Nenhum evento cadastrado.");
    }
    for r in self.0 {
      let e = &r.data;
      writeln!(
        f,
        "{}  {}  {} ({})  {}  {}",
        r.id,
        when(e.date, e.time),
        e.title,
        e.client_name,
        e.status,
        Progress(e.progress()),
      )?;
    }
    Ok(())
  }
}

pub struct VendorList<'a>(pub &'a [Record<Vendor>]);

impl Display for VendorList<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    heading(f, &format!("Fornecedores ({})", self.0.len()))?;
    if self.0.is_empty() {
      return writeln!(f, "Nenhum fornecedor cadastrado.");
    }
    for r in self.0 {
      let v = &r.data;
      writeln!(
        f,
        "{}  {}  [{}]  {}  {} produto(s)",
        r.id,
        v.name,
        v.category,
        v.contact,
        v.products.len()
      )?;
    }
    Ok(())
  }
}
