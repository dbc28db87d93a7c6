//! Per-user branding shown on report headers.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BRAND_LABEL: &str = "Cerimonial";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
  pub label:         String,
  /// CSS-style colour, e.g. `#8B5CF6`.
  #[serde(default)]
  pub primary_color: Option<String>,
  /// Path or data URL of the logo image.
  #[serde(default)]
  pub logo:          Option<String>,
}

impl Default for Branding {
  fn default() -> Self {
    Self { label: DEFAULT_BRAND_LABEL.to_owned(), primary_color: None, logo: None }
  }
}

impl Branding {
  /// Build branding from optional stored settings, applying the default label
  /// when none (or an empty one) was saved.
  pub fn from_parts(
    label: Option<String>,
    primary_color: Option<String>,
    logo: Option<String>,
  ) -> Self {
    Self {
      label: label
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BRAND_LABEL.to_owned()),
      primary_color,
      logo,
    }
  }
}
