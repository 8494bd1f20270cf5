//! Configuration for the agent console.
//!
//! Layered through the `config` crate: built-in defaults, the global file
//! (`<config_dir>/agentdeck/config.toml`), an explicit `--config` file, then
//! `AGENTDECK__*` environment variables.

mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use crate::logging::LoggingConfig;
pub use facade::ConfigLoader;

use crate::error::SyncError;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub feature_gate: FeatureGateConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConsoleConfig {
    pub fn validate(&self) -> Result<(), SyncError> {
        self.store.validate()?;
        self.feature_gate.validate()
    }
}

/// Where the configuration store lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_agents_path")]
    pub agents_path: String,

    #[serde(default = "default_check_support_path")]
    pub check_support_path: String,

    #[serde(default = "default_models_path")]
    pub models_path: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_agents_path() -> String {
    "/api/management/agents".to_string()
}

fn default_check_support_path() -> String {
    "/api/management/agents/check_supported_model".to_string()
}

fn default_models_path() -> String {
    "/api/management/config/models".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            agents_path: default_agents_path(),
            check_support_path: default_check_support_path(),
            models_path: default_models_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), SyncError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(SyncError::Config(format!(
                "store.base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        for (key, path) in [
            ("agents_path", &self.agents_path),
            ("check_support_path", &self.check_support_path),
            ("models_path", &self.models_path),
        ] {
            if !path.starts_with('/') {
                return Err(SyncError::Config(format!(
                    "store.{} must start with '/', got '{}'",
                    key, path
                )));
            }
        }
        if self.timeout_secs == 0 {
            return Err(SyncError::Config(
                "store.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Cache windows for the multi-agent capability check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureGateConfig {
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,

    #[serde(default = "default_expire_after_secs")]
    pub expire_after_secs: u64,
}

fn default_stale_after_secs() -> u64 {
    300
}

fn default_expire_after_secs() -> u64 {
    600
}

impl Default for FeatureGateConfig {
    fn default() -> Self {
        Self {
            stale_after_secs: default_stale_after_secs(),
            expire_after_secs: default_expire_after_secs(),
        }
    }
}

impl FeatureGateConfig {
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.expire_after_secs < self.stale_after_secs {
            return Err(SyncError::Config(format!(
                "feature_gate.expire_after_secs ({}) must not be less than stale_after_secs ({})",
                self.expire_after_secs, self.stale_after_secs
            )));
        }
        Ok(())
    }
}
