//! Scanner configuration.
//!
//! Settings come from built-in defaults, then an optional JSON file, then
//! `A11Y_*` environment variables, each layer overriding the previous one.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::service::http::ClientType;

pub const ENV_DATABASE_URL: &str = "A11Y_DATABASE_URL";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "A11Y_FETCH_TIMEOUT_SECS";
pub const ENV_BROWSER_EMULATION: &str = "A11Y_BROWSER_EMULATION";
pub const ENV_MAX_CONNECTIONS: &str = "A11Y_MAX_CONNECTIONS";
pub const ENV_LOG: &str = "A11Y_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScannerConfig {
    pub database_url: String,
    pub fetch_timeout_secs: u64,
    /// Impersonate a desktop browser when fetching pages
    pub browser_emulation: bool,
    pub max_connections: u32,
    /// `EnvFilter` directive for log output
    pub log_filter: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://accessibility.db?mode=rwc".to_string(),
            fetch_timeout_secs: 30,
            browser_emulation: false,
            max_connections: 5,
            log_filter: "info".to_string(),
        }
    }
}

impl ScannerConfig {
    /// Defaults, overlaid with `path` (when given) and then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Applies overrides from a variable lookup. Unset variables leave the field alone.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.database_url = url;
        }
        if let Some(secs) = lookup(ENV_FETCH_TIMEOUT_SECS) {
            self.fetch_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", ENV_FETCH_TIMEOUT_SECS))?;
        }
        if let Some(flag) = lookup(ENV_BROWSER_EMULATION) {
            self.browser_emulation = parse_flag(&flag)
                .with_context(|| format!("{} must be true or false", ENV_BROWSER_EMULATION))?;
        }
        if let Some(max) = lookup(ENV_MAX_CONNECTIONS) {
            self.max_connections = max
                .trim()
                .parse()
                .with_context(|| format!("{} must be a positive integer", ENV_MAX_CONNECTIONS))?;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = filter;
        }
        Ok(())
    }

    pub fn client_type(&self) -> ClientType {
        if self.browser_emulation {
            ClientType::HeavyEmulation
        } else {
            ClientType::Standard
        }
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("unrecognized flag value '{}'", other)),
    }
}
