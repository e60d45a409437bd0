//! Layered configuration: defaults, then an optional TOML file, then
//! `SNAPMAP_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use snapmap_ingest::{AnthropicConfig, GenerationParams};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// SQLite file holding the records.
  pub db_path:            PathBuf,
  /// Where auto-named CSV backups are written.
  pub backup_dir:         PathBuf,
  pub anthropic_api_key:  String,
  pub anthropic_base_url: String,
  pub model:              String,
  pub max_tokens:         u32,
  pub temperature:        f32,
  pub host:               String,
  pub port:               u16,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      db_path:            PathBuf::from("my_records.db"),
      backup_dir:         PathBuf::from("."),
      anthropic_api_key:  String::new(),
      anthropic_base_url: "https://api.anthropic.com".to_string(),
      model:              "claude-opus-4-1-20250805".to_string(),
      max_tokens:         2000,
      temperature:        0.7,
      host:               "127.0.0.1".to_string(),
      port:               8080,
    }
  }
}

impl Settings {
  /// Read `path` if it exists and overlay the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let raw = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("SNAPMAP"))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut settings: Settings = raw
      .try_deserialize()
      .context("failed to deserialise settings")?;

    settings.db_path = expand_tilde(&settings.db_path);
    settings.backup_dir = expand_tilde(&settings.backup_dir);
    Ok(settings)
  }

  pub fn anthropic(&self) -> AnthropicConfig {
    AnthropicConfig {
      base_url: self.anthropic_base_url.clone(),
      api_key:  self.anthropic_api_key.clone(),
      model:    self.model.clone(),
    }
  }

  pub fn generation_params(&self) -> GenerationParams {
    GenerationParams { max_tokens: self.max_tokens, temperature: self.temperature }
  }

  pub fn listen_address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
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
  fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let s = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(s.max_tokens, 2000);
    assert_eq!(s.model, "claude-opus-4-1-20250805");
    assert_eq!(s.listen_address(), "127.0.0.1:8080");
  }

  #[test]
  fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapmap.toml");
    std::fs::write(&path, "db_path = \"/tmp/food.db\"\nport = 9000\ntemperature = 0.2\n").unwrap();

    let s = Settings::load(&path).unwrap();
    assert_eq!(s.db_path, PathBuf::from("/tmp/food.db"));
    assert_eq!(s.port, 9000);
    assert_eq!(s.generation_params().temperature, 0.2);
    assert_eq!(s.backup_dir, PathBuf::from("."));
  }

  #[test]
  fn tilde_only_expands_as_a_prefix() {
    assert_eq!(expand_tilde(Path::new("data/x.db")), PathBuf::from("data/x.db"));
    assert_eq!(expand_tilde(Path::new("a/~/b")), PathBuf::from("a/~/b"));
    if std::env::var("HOME").is_ok() {
      let expanded = expand_tilde(Path::new("~/x.db"));
      assert!(!expanded.starts_with("~"));
      assert!(expanded.ends_with("x.db"));
    }
  }
}
