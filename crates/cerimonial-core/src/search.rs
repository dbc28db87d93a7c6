//! Free-text filter applied client-side across the three record lists.

use crate::{
  client::Client,
  event::Event,
  record::{Entity, Record},
  vendor::Vendor,
};

/// Keep the records whose searchable fields contain `query`, ignoring case.
/// A blank query keeps everything.
pub fn filter<T: Entity>(records: Vec<Record<T>>, query: &str) -> Vec<Record<T>> {
  let needle = query.trim().to_lowercase();
  if needle.is_empty() {
    return records;
  }
  records.into_iter().filter(|r| r.data.matches(&needle)).collect()
}

/// Matches of one query across every list.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
  pub clients: Vec<Record<Client>>,
  pub events:  Vec<Record<Event>>,
  pub vendors: Vec<Record<Vendor>>,
}

impl SearchResults {
  pub fn collect(
    query: &str,
    clients: Vec<Record<Client>>,
    events: Vec<Record<Event>>,
    vendors: Vec<Record<Vendor>>,
  ) -> Self {
    Self {
      clients: filter(clients, query),
      events:  filter(events, query),
      vendors: filter(vendors, query),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.clients.is_empty() && self.events.is_empty() && self.vendors.is_empty()
  }
}
