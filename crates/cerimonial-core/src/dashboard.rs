//! The overview screen: counts, upcoming events and overall checklist
//! progress.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{
  client::Client,
  event::{Event, percent},
  record::Record,
  vendor::Vendor,
};

/// How many scheduled events the overview lists.
pub const UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingEvent {
  pub id:          Uuid,
  pub title:       String,
  pub client_name: String,
  pub date:        NaiveDate,
  pub time:        Option<NaiveTime>,
  pub progress:    u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
  pub clients:          usize,
  pub events:           usize,
  pub vendors:          usize,
  pub scheduled:        usize,
  pub completed:        usize,
  /// Done tasks over all tasks of all events, as a percentage.
  pub average_progress: u8,
  /// The earliest scheduled events, at most [`UPCOMING_LIMIT`].
  pub upcoming:         Vec<UpcomingEvent>,
}

impl Dashboard {
  pub fn build(
    clients: &[Record<Client>],
    events: &[Record<Event>],
    vendors: &[Record<Vendor>],
  ) -> Self {
    let (done, total) = events.iter().fold((0, 0), |(done, total), e| {
      let (d, t) = e.data.checklist_counts();
      (done + d, total + t)
    });

    let mut scheduled: Vec<&Record<Event>> =
      events.iter().filter(|e| !e.data.is_completed()).collect();
    scheduled.sort_by_key(|e| (e.data.date, e.data.time));

    let upcoming = scheduled
      .iter()
      .take(UPCOMING_LIMIT)
      .map(|e| UpcomingEvent {
        id:          e.id,
        title:       e.data.title.clone(),
        client_name: e.data.client_name.clone(),
        date:        e.data.date,
        time:        e.data.time,
        progress:    e.data.progress(),
      })
      .collect();

    Self {
      clients: clients.len(),
      events: events.len(),
      vendors: vendors.len(),
      scheduled: scheduled.len(),
      completed: events.len() - scheduled.len(),
      average_progress: percent(done, total),
      upcoming,
    }
  }
}
