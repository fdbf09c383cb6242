//! Workspace configuration — explicit load, no import-time globals
//!
//! The concierge reads a TOML file naming its remote sellers, then applies
//! `<NAME>_SELLER_URL` environment overrides. Everything is passed into
//! constructors explicitly; nothing is read from the environment after load.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};
use url::Url;

/// Default per-call timeout for remote seller requests, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How the transport authenticates to a seller endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum AuthMode {
    /// No Authorization header — local development only
    #[default]
    None,
    /// Audience-scoped identity token from the platform metadata endpoint
    Metadata,
    /// Fixed bearer token
    Static { token: String },
}

/// One remote seller agent the concierge can delegate to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerEndpoint {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub auth: AuthMode,
}

/// Top-level concierge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConciergeConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub sellers: Vec<SellerEndpoint>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ConciergeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            sellers: Vec::new(),
        }
    }
}

impl ConciergeConfig {
    /// Parse a TOML string into a validated config
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: ConciergeConfig =
            toml::from_str(content).context("Failed to parse concierge config")?;
        config.validate()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Self::parse(&content)
    }

    /// Look up a seller by name (case-insensitive)
    pub fn seller(&self, name: &str) -> Option<&SellerEndpoint> {
        self.sellers
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be non-zero");
        }
        for seller in &self.sellers {
            if seller.name.trim().is_empty() {
                bail!("Seller name cannot be empty");
            }
            Url::parse(&seller.url)
                .with_context(|| format!("Invalid URL for seller '{}'", seller.name))?;
        }
        Ok(())
    }

    /// Apply `<NAME>_SELLER_URL` environment overrides, e.g.
    /// `BURGER_SELLER_URL` for a seller named "burger".
    fn apply_env_overrides(&mut self) {
        for seller in &mut self.sellers {
            let var = format!(
                "{}_SELLER_URL",
                seller.name.to_uppercase().replace(['-', ' '], "_")
            );
            if let Ok(url) = std::env::var(&var) {
                if Url::parse(&url).is_ok() {
                    debug!("Overriding seller '{}' URL from {}", seller.name, var);
                    seller.url = url;
                } else {
                    warn!("Ignoring invalid URL in {}: {}", var, url);
                }
            }
        }
    }
}
