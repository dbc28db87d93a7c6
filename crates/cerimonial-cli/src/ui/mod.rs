//! Text views printed after each command.
//!
//! Every view is a small wrapper implementing [`Display`], so callers print
//! with `println!("{}", ui::ClientList(&clients))`.

pub mod detail;
pub mod lists;
pub mod overview;

use std::fmt::{self, Display};

use cerimonial_core::contract::format_date;
use chrono::{NaiveDate, NaiveTime};

pub use detail::{ClientDetail, EventDetail, VendorDetail};
pub use lists::{ClientList, EventList, VendorList};
pub use overview::{DashboardView, SearchView};

/// `dd/mm/yyyy`, or `dd/mm/yyyy às HH:MM` when a time is set.
pub(crate) fn when(date: NaiveDate, time: Option<NaiveTime>) -> String {
  match time {
    Some(t) => format!("{} às {}", format_date(date), t.format("%H:%M")),
    None => format_date(date),
  }
}

/// A `[####------] 40%` progress bar.
pub(crate) struct Progress(pub u8);

impl Display for Progress {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    const CELLS: usize = 10;
    let filled = (usize::from(self.0.min(100)) * CELLS + 50) / 100;
    write!(f, "[{}{}] {:>3}%", "#".repeat(filled), "-".repeat(CELLS - filled), self.0)
  }
}

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
  writeln!(f, "{title}")?;
  writeln!(f, "{}", "─".repeat(title.chars().count()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn progress_bar_rounds_to_cells() {
    assert_eq!(Progress(0).to_string(), "[----------]   0%");
    assert_eq!(Progress(45).to_string(), "[#####-----]  45%");
    assert_eq!(Progress(100).to_string(), "[##########] 100%");
  }

  #[test]
  fn when_includes_optional_time() {
    let date = NaiveDate::from_ymd_opt(2026, 11, 14).unwrap();
    assert_eq!(when(date, None), "14/11/2026");
    assert_eq!(when(date, NaiveTime::from_hms_opt(9, 5, 0)), "14/11/2026 às 09:05");
  }
}
