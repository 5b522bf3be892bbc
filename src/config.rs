use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable that overrides `api.url`
pub const URL_ENV: &str = "GROCER_API_URL";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  pub api: ApiConfig,
  /// Custom title for header (defaults to the API host if not set)
  pub title: Option<String>,
  /// Log filter used when RUST_LOG is unset
  pub log_level: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api: ApiConfig::default(),
      title: None,
      log_level: "info".to_string(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  /// Server root, e.g. http://localhost:8000
  pub url: String,
  /// Path of the items resource
  pub endpoint: String,
  pub timeout_secs: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      url: "http://localhost:8000".to_string(),
      endpoint: "/api/grocery-items".to_string(),
      timeout_secs: 30,
    }
  }
}

impl ApiConfig {
  /// The server root as a parsed URL
  pub fn base_url(&self) -> Result<Url> {
    let url = Url::parse(&self.url).map_err(|e| eyre!("Invalid API URL {:?}: {}", self.url, e))?;
    match url.scheme() {
      "http" | "https" => Ok(url),
      other => Err(eyre!("Unsupported API URL scheme {:?} in {}", other, self.url)),
    }
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./grocer.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/grocer/config.yaml
  ///
  /// Without a file the defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("grocer.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("grocer").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
    // An empty file is valid and means defaults
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents)
  }

  /// Apply the URL overrides. The command line flag beats the environment.
  pub fn with_url_override(mut self, env_url: Option<String>, flag_url: Option<String>) -> Self {
    if let Some(url) = flag_url.or(env_url) {
      self.api.url = url;
    }
    self
  }

  /// Read the environment override
  pub fn env_url() -> Option<String> {
    std::env::var(URL_ENV).ok().filter(|v| !v.trim().is_empty())
  }

  /// Header label
  pub fn title(&self) -> String {
    self
      .title
      .clone()
      .unwrap_or_else(|| crate::ui::renderfns::extract_domain(&self.api.url).to_string())
  }
}
