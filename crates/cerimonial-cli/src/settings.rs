//! Layered configuration: defaults, then `cerimonial.toml`, then
//! `CERIMONIAL_*` environment variables, then `--store`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

pub const DEFAULT_STORE_PATH: &str = "~/.cerimonial/cerimonial.db";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite database file. A leading `~/` is expanded.
  pub store_path: PathBuf,
}

impl Settings {
  pub fn load(file: &Path, store_override: Option<&Path>) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("CERIMONIAL"))
      .set_override_option(
        "store_path",
        store_override.map(|p| p.to_string_lossy().into_owned()),
      )?
      .build()
      .context("failed to read config file")?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn store_flag_overrides_everything() {
    let settings = Settings::load(
      Path::new("does-not-exist.toml"),
      Some(Path::new("/tmp/agenda.db")),
    )
    .unwrap();
    assert_eq!(settings.store_path, PathBuf::from("/tmp/agenda.db"));
  }

  #[test]
  fn file_value_is_read() {
    let dir = std::env::temp_dir().join(format!("cerimonial-settings-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let file = dir.join("cerimonial.toml");
    std::fs::write(&file, "store_path = \"/srv/cerimonial/data.db\"\n").unwrap();

    let settings = Settings::load(&file, None).unwrap();
    assert_eq!(settings.store_path, PathBuf::from("/srv/cerimonial/data.db"));

    std::fs::remove_dir_all(&dir).ok();
  }

  #[test]
  fn tilde_expands_against_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/x.db")), PathBuf::from(home).join("x.db"));
    assert_eq!(expand_tilde(Path::new("/abs/x.db")), PathBuf::from("/abs/x.db"));
  }
}
