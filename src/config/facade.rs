//! ConfigLoader facade delegating to the merge service.

use super::merge::service::MergeService;
use super::ConsoleConfig;
use crate::error::SyncError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from the global file (if any) and environment, with an optional explicit file on top.
    pub fn load(explicit: Option<&Path>) -> Result<ConsoleConfig, SyncError> {
        let config = MergeService::load(explicit)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from one file plus environment, ignoring the global file.
    pub fn load_from_file(path: &Path) -> Result<ConsoleConfig, SyncError> {
        let config = MergeService::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn default() -> ConsoleConfig {
        ConsoleConfig::default()
    }
}
