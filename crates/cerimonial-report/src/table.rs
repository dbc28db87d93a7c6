//! Column-aligned plain-text tables.

use std::fmt::{self, Write};

const GUTTER: &str = "  ";

/// A table rendered as left-aligned columns under a dashed header rule.
pub(crate) struct Table {
  headers: Vec<&'static str>,
  rows:    Vec<Vec<String>>,
  /// Printed as the only body line when there are no rows.
  empty:   Option<&'static str>,
}

impl Table {
  pub(crate) fn new(headers: &[&'static str]) -> Self {
    Self { headers: headers.to_vec(), rows: Vec::new(), empty: None }
  }

  pub(crate) fn when_empty(mut self, message: &'static str) -> Self {
    self.empty = Some(message);
    self
  }

  /// Append a row. Missing trailing cells render blank.
  pub(crate) fn row<I, S>(&mut self, cells: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.rows.push(cells.into_iter().map(Into::into).collect());
  }

  fn widths(&self) -> Vec<usize> {
    let mut widths: Vec<usize> = self.headers.iter().map(|h| width(h)).collect();
    for row in &self.rows {
      for (i, cell) in row.iter().enumerate().take(widths.len()) {
        widths[i] = widths[i].max(width(cell));
      }
    }
    widths
  }

  pub(crate) fn write_to(&self, out: &mut impl Write) -> fmt::Result {
    let widths = self.widths();

    write_line(out, &widths, self.headers.iter().copied())?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_line(out, &widths, rule.iter().map(String::as_str))?;

    if self.rows.is_empty() {
      if let Some(message) = self.empty {
        writeln!(out, "{message}")?;
      }
      return Ok(());
    }

    for row in &self.rows {
      write_line(out, &widths, row.iter().map(String::as_str))?;
    }
    Ok(())
  }
}

fn width(s: &str) -> usize { s.chars().count() }

fn write_line<'a>(
  out: &mut impl Write,
  widths: &[usize],
  cells: impl Iterator<Item = &'a str>,
) -> fmt::Result {
  let mut line = String::new();
  let mut cells = cells;
  for (i, w) in widths.iter().enumerate() {
    let cell = cells.next().unwrap_or("");
    if i > 0 {
      line.push_str(GUTTER);
    }
    line.push_str(cell);
    line.extend(std::iter::repeat_n(' ', w.saturating_sub(width(cell))));
  }
  writeln!(out, "{}", line.trim_end())
}
