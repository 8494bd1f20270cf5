//! Configuration store port
//!
//! The remote configuration store is an external collaborator. The core only
//! depends on the [`ConfigStoreClient`] contract; adapters live beside it.

pub mod http;
pub mod memory;

use crate::agent::domain::AgentConfig;
use crate::error::SyncError;
use async_trait::async_trait;

pub use http::HttpConfigStore;
pub use memory::{MemoryConfigStore, StoreHold, StoreOp};

/// CRUD access to agent records plus the multi-agent capability check.
///
/// Every call fails with a distinguishable `Transport` or `Validation` error
/// (`NotFound` for unknown agents). Nothing here retries.
#[async_trait]
pub trait ConfigStoreClient: Send + Sync {
    /// All agent records
    async fn list(&self) -> Result<Vec<AgentConfig>, SyncError>;

    /// Create a record. The store must keep the supplied `agent_id` or reject the call.
    async fn create(&self, config: &AgentConfig) -> Result<AgentConfig, SyncError>;

    /// Replace the record for `agent_id` and return the stored copy
    async fn update(&self, agent_id: &str, config: &AgentConfig)
        -> Result<AgentConfig, SyncError>;

    async fn delete(&self, agent_id: &str) -> Result<(), SyncError>;

    /// Whether the configured model backend supports multi-agent mode
    async fn check_feature_support(&self) -> Result<bool, SyncError>;
}

/// Model listing for provider configuration panels.
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    async fn fetch_models(&self, provider: &str) -> Result<Vec<String>, SyncError>;
}
