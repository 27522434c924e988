// =============================================================================
// Runtime Configuration — scanner settings with env overrides
// =============================================================================
//
// Settings come from an optional JSON file, then environment variables win.
// All fields carry `#[serde(default)]` so that adding new fields never breaks
// loading an older config file.
//
// The Polygon API key is not part of this struct. It is read from
// the environment once at startup and never serialised.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_state_path() -> PathBuf {
    PathBuf::from("data/state.json")
}

fn default_history_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default()
}

fn default_polygon_base_url() -> String {
    "https://api.polygon.io".to_string()
}

// =============================================================================
// ScannerConfig
// =============================================================================

/// Top-level configuration for the scanner service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Address the HTTP API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Location of the persisted state document.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// First date requested from the market-data source for every symbol.
    #[serde(default = "default_history_start")]
    pub history_start: NaiveDate,

    /// Base URL of the Polygon REST API.
    #[serde(default = "default_polygon_base_url")]
    pub polygon_base_url: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            state_path: default_state_path(),
            history_start: default_history_start(),
            polygon_base_url: default_polygon_base_url(),
        }
    }
}

impl ScannerConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scanner config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse scanner config from {}", path.display()))?;

        info!(
            path = %path.display(),
            state_path = %config.state_path.display(),
            history_start = %config.history_start,
            "scanner config loaded"
        );

        Ok(config)
    }

    /// Apply `SCANNER_*` / `POLYGON_BASE_URL` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        if let Some(addr) = get("SCANNER_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(path) = get("SCANNER_STATE_PATH") {
            self.state_path = PathBuf::from(path);
        }
        if let Some(raw) = get("SCANNER_HISTORY_START") {
            match raw.parse::<NaiveDate>() {
                Ok(date) => self.history_start = date,
                Err(e) => warn!(value = %raw, error = %e, "ignoring invalid SCANNER_HISTORY_START"),
            }
        }
        if let Some(url) = get("POLYGON_BASE_URL") {
            self.polygon_base_url = url;
        }
    }
}
