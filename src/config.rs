//! Application configuration.
//!
//! Loaded from a TOML file in the platform config directory; a missing
//! file means defaults. Grid geometry and the cache TTL live here so the
//! engine never hard-codes presentation constants.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::grid::GridGeometry;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the schedule backend.
    pub base_url: String,
    /// Bearer token for authenticated calls. Session handling itself is
    /// outside this crate; the token arrives from the environment.
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub grid: GridGeometry,
    /// Seconds a fetched data window stays reusable.
    pub cache_ttl_secs: Option<u64>,
}

impl AppConfig {
    /// Load from the platform config dir, falling back to defaults when no
    /// file exists.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "skedule").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl_secs
            .map(Duration::from_secs)
            .unwrap_or(crate::services::schedule::DEFAULT_TTL)
    }
}
