//! Configuration file loading and merging with command line values.
//!
//! Precedence: command line / environment, then the TOML file, then built-in defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const APP_DIR: &str = "threadcraft";

/// Navigation skin of the interactive UI.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    #[default]
    Sidebar,
    TopNav,
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
    pub user: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub layout: Option<Layout>,
}

/// Values taken from the command line and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub user: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub layout: Option<Layout>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub user: Option<String>,
    pub data_dir: PathBuf,
    pub log_level: String,
    pub layout: Layout,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Parse a config file.
pub fn load_file(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parse config {}", path.display()))
}

/// Load an explicit config file, or the default one when it exists.
///
/// A missing default file is not an error; a missing explicit file is.
pub fn load(explicit: Option<&Path>) -> Result<FileConfig> {
    if let Some(p) = explicit {
        return load_file(p);
    }
    match default_config_path() {
        Some(p) if p.exists() => load_file(&p),
        _ => Ok(FileConfig::default()),
    }
}

impl AppConfig {
    pub fn merge(cli: Overrides, file: FileConfig) -> Self {
        Self {
            api_key: non_empty(cli.api_key).or_else(|| non_empty(file.api_key)),
            model: non_empty(cli.model)
                .or_else(|| non_empty(file.model))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_empty(cli.base_url)
                .or_else(|| non_empty(file.base_url))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: cli.timeout.or(file.timeout).unwrap_or(DEFAULT_TIMEOUT),
            user: non_empty(cli.user).or_else(|| non_empty(file.user)),
            data_dir: cli
                .data_dir
                .or(file.data_dir)
                .unwrap_or_else(default_data_dir),
            log_level: non_empty(file.log_level).unwrap_or_else(|| "info".to_string()),
            layout: cli.layout.or(file.layout).unwrap_or_default(),
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("threadcraft.log")
    }
}
