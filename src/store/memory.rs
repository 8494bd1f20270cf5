//! In-memory configuration store.
//!
//! Behaves like the real store (validates roles, fills in missing tools,
//! answers the capability check from the selected model provider) and adds
//! knobs for exercising failure and timing: queued failures per operation and
//! holds that keep the next call of an operation pending until released.

use crate::agent::domain::AgentConfig;
use crate::error::SyncError;
use crate::provider::ModelProviderConfig;
use crate::store::{ConfigStoreClient, ModelCatalog};
use crate::types::AgentId;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, VecDeque};
use tokio::sync::oneshot;

/// Store operations, used to target failures and holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    List,
    Create,
    Update,
    Delete,
    CheckSupport,
    FetchModels,
}

/// A pending call held inside the store.
pub struct StoreHold {
    entered: oneshot::Receiver<()>,
    release: oneshot::Sender<()>,
}

impl StoreHold {
    /// Wait until the held call has reached the store.
    pub async fn entered(&mut self) {
        let _ = (&mut self.entered).await;
    }

    /// Let the held call complete.
    pub fn release(self) {
        let _ = self.release.send(());
    }
}

struct HeldCall {
    entered: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

#[derive(Default)]
pub struct MemoryConfigStore {
    agents: Mutex<BTreeMap<AgentId, AgentConfig>>,
    provider: Mutex<Option<ModelProviderConfig>>,
    models: Mutex<HashMap<String, Vec<String>>>,
    failures: Mutex<HashMap<StoreOp, VecDeque<SyncError>>>,
    holds: Mutex<HashMap<StoreOp, VecDeque<HeldCall>>>,
    calls: Mutex<HashMap<StoreOp, usize>>,
    reassign_ids: Mutex<bool>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `agents`
    pub fn with_agents(agents: Vec<AgentConfig>) -> Self {
        let store = Self::new();
        {
            let mut map = store.agents.lock();
            for mut agent in agents {
                agent.payload.fill_missing_tools();
                map.insert(agent.agent_id.clone(), agent);
            }
        }
        store
    }

    /// Select the model provider the capability check answers for.
    pub fn set_model_provider(&self, provider: ModelProviderConfig) {
        *self.provider.lock() = Some(provider);
    }

    pub fn set_models(&self, provider: &str, models: Vec<String>) {
        self.models.lock().insert(provider.to_string(), models);
    }

    /// Make the next call of `op` fail with `err`.
    pub fn fail_next(&self, op: StoreOp, err: SyncError) {
        self.failures.lock().entry(op).or_default().push_back(err);
    }

    /// Keep the next call of `op` pending until the returned hold is released.
    pub fn hold_next(&self, op: StoreOp) -> StoreHold {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.holds.lock().entry(op).or_default().push_back(HeldCall {
            entered: entered_tx,
            release: release_rx,
        });
        StoreHold {
            entered: entered_rx,
            release: release_tx,
        }
    }

    /// Assign store-side ids on create instead of keeping the client's.
    pub fn reassign_ids(&self, enabled: bool) {
        *self.reassign_ids.lock() = enabled;
    }

    /// Number of calls made for `op`
    pub fn calls(&self, op: StoreOp) -> usize {
        self.calls.lock().get(&op).copied().unwrap_or(0)
    }

    /// Stored copy of one agent
    pub fn stored(&self, agent_id: &str) -> Option<AgentConfig> {
        self.agents.lock().get(agent_id).cloned()
    }

    pub fn stored_count(&self) -> usize {
        self.agents.lock().len()
    }

    /// Count the call, wait out any hold, then return a queued failure if any.
    async fn enter(&self, op: StoreOp) -> Result<(), SyncError> {
        *self.calls.lock().entry(op).or_insert(0) += 1;
        let held = self
            .holds
            .lock()
            .get_mut(&op)
            .and_then(|queue| queue.pop_front());
        if let Some(held) = held {
            let _ = held.entered.send(());
            let _ = held.release.await;
        }
        match self
            .failures
            .lock()
            .get_mut(&op)
            .and_then(|queue| queue.pop_front())
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ConfigStoreClient for MemoryConfigStore {
    async fn list(&self) -> Result<Vec<AgentConfig>, SyncError> {
        self.enter(StoreOp::List).await?;
        let mut agents: Vec<AgentConfig> = self.agents.lock().values().cloned().collect();
        agents.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(agents)
    }

    async fn create(&self, config: &AgentConfig) -> Result<AgentConfig, SyncError> {
        self.enter(StoreOp::Create).await?;
        if config.payload.role.trim().is_empty() {
            return Err(SyncError::Validation(
                "Role is required when creating an agent".to_string(),
            ));
        }
        let mut created = config.clone();
        if *self.reassign_ids.lock() {
            created.agent_id = uuid::Uuid::new_v4().to_string();
        }
        created.payload.fill_missing_tools();

        let mut agents = self.agents.lock();
        if agents.contains_key(&created.agent_id) {
            return Err(SyncError::Validation(format!(
                "Agent with id {} already exists",
                created.agent_id
            )));
        }
        agents.insert(created.agent_id.clone(), created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        agent_id: &str,
        config: &AgentConfig,
    ) -> Result<AgentConfig, SyncError> {
        self.enter(StoreOp::Update).await?;
        let mut agents = self.agents.lock();
        let stored = agents
            .get(agent_id)
            .ok_or_else(|| SyncError::NotFound(format!("Agent with id {} not found", agent_id)))?;
        if config.payload.role.trim().is_empty() {
            return Err(SyncError::Validation(
                "Role is required when updating an agent".to_string(),
            ));
        }
        let mut updated = config.clone();
        updated.agent_id = stored.agent_id.clone();
        updated.created_at = stored.created_at;
        updated.is_default = stored.is_default;
        updated.payload.fill_missing_tools();
        agents.insert(agent_id.to_string(), updated.clone());
        Ok(updated)
    }

    async fn delete(&self, agent_id: &str) -> Result<(), SyncError> {
        self.enter(StoreOp::Delete).await?;
        self.agents.lock().remove(agent_id);
        Ok(())
    }

    async fn check_feature_support(&self) -> Result<bool, SyncError> {
        self.enter(StoreOp::CheckSupport).await?;
        Ok(self
            .provider
            .lock()
            .as_ref()
            .map(ModelProviderConfig::supports_multi_agent)
            .unwrap_or(false))
    }
}

#[async_trait]
impl ModelCatalog for MemoryConfigStore {
    async fn fetch_models(&self, provider: &str) -> Result<Vec<String>, SyncError> {
        self.enter(StoreOp::FetchModels).await?;
        Ok(self.models.lock().get(provider).cloned().unwrap_or_default())
    }
}
