//! Configuration loading
//!
//! Settings come from an optional TOML file (default
//! `<config dir>/aft/config.toml`, or `--config` / `AFT_CONFIG`) and a few
//! environment overrides. Every key has a default, so running without a
//! file is the normal case.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::FundError;
use crate::fund::{Portfolio, PortfolioEntry};

const DEFAULT_FX_SYMBOL: &str = "USDTRY=X";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; AftBot/1.0)";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Symbol of the USD/TRY rate on the price feed
    pub fx_symbol: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Replay prices from this CSV instead of the live feed
    pub prices_file: Option<PathBuf>,
    /// Replaces the built-in basket when non-empty
    pub fund: Vec<PortfolioEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fx_symbol: DEFAULT_FX_SYMBOL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            prices_file: None,
            fund: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration, honouring an explicit path first, then
    /// `AFT_CONFIG`, then the default location.
    ///
    /// An explicitly named file must exist; the default one is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os("AFT_CONFIG").map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_file(&path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self, FundError> {
        toml::from_str(raw).map_err(|e| FundError::Config(e.to_string()))
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(symbol) = var("AFT_FX_SYMBOL").filter(|s| !s.trim().is_empty()) {
            self.fx_symbol = symbol.trim().to_string();
        }
        if let Some(file) = var("AFT_PRICES_FILE").filter(|s| !s.trim().is_empty()) {
            self.prices_file = Some(PathBuf::from(file));
        }
    }

    /// The fund to simulate: the configured basket, or the built-in one
    pub fn portfolio(&self) -> Result<Portfolio, FundError> {
        if self.fund.is_empty() {
            Ok(Portfolio::aft())
        } else {
            Portfolio::new(self.fund.clone())
        }
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dir_spec::config_home().map(|dir| dir.join("aft").join("config.toml"))
}
