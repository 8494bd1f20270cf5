//! Sync engine: optimistic create/update/delete reconciled with store truth.
//!
//! The engine exclusively owns the roster and the active selection. Every
//! structural mutation runs under a [`MutationPermit`]; a second request while
//! one is outstanding is rejected with a conflict. Locks on engine state are
//! never held across a store call, and every completion re-checks that what it
//! is about to touch is still relevant.

use crate::agent::domain::{validate_agent_config, AgentConfig};
use crate::agent::roster::{AgentRoster, RosterEntry};
use crate::concurrency::{MutationGate, MutationPermit};
use crate::error::{ConflictReason, MutationKind, SyncError};
use crate::notice::NoticeBoard;
use crate::store::ConfigStoreClient;
use crate::types::AgentId;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct EngineState {
    roster: AgentRoster,
    selection: Option<AgentId>,
}

impl EngineState {
    /// Point the selection at a roster member whenever the roster has any.
    fn converge_selection(&mut self) {
        let valid = self
            .selection
            .as_deref()
            .map(|id| self.roster.contains(id))
            .unwrap_or(false);
        if !valid {
            let next = self.roster.first().map(|c| c.agent_id.clone());
            if self.selection != next {
                debug!(from = ?self.selection, to = ?next, "Selection converged");
            }
            self.selection = next;
        }
    }
}

/// Read-only view of roster and selection.
#[derive(Debug, Clone)]
pub struct RosterSnapshot {
    pub entries: Vec<RosterEntry>,
    pub selection: Option<AgentId>,
    pub loaded: bool,
    pub revision: u64,
    pub in_flight: Option<MutationKind>,
}

impl RosterSnapshot {
    pub fn ids(&self) -> Vec<AgentId> {
        self.entries
            .iter()
            .map(|entry| entry.config.agent_id.clone())
            .collect()
    }
}

pub struct SyncEngine {
    store: Arc<dyn ConfigStoreClient>,
    state: RwLock<EngineState>,
    gate: MutationGate,
    notices: Arc<NoticeBoard>,
}

impl SyncEngine {
    pub fn new(store: Arc<dyn ConfigStoreClient>, notices: Arc<NoticeBoard>) -> Self {
        Self {
            store,
            state: RwLock::new(EngineState::default()),
            gate: MutationGate::new(),
            notices,
        }
    }

    pub fn gate(&self) -> &MutationGate {
        &self.gate
    }

    pub fn notices(&self) -> &Arc<NoticeBoard> {
        &self.notices
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        let state = self.state.read();
        RosterSnapshot {
            entries: state.roster.entries().to_vec(),
            selection: state.selection.clone(),
            loaded: state.roster.is_loaded(),
            revision: state.roster.revision(),
            in_flight: self.gate.in_flight(),
        }
    }

    /// Currently selected agent id
    pub fn selection(&self) -> Option<AgentId> {
        self.state.read().selection.clone()
    }

    /// Stored copy of one agent
    pub fn agent(&self, agent_id: &str) -> Option<AgentConfig> {
        self.state.read().roster.get(agent_id).cloned()
    }

    pub fn contains(&self, agent_id: &str) -> bool {
        self.state.read().roster.contains(agent_id)
    }

    pub fn roster_len(&self) -> usize {
        self.state.read().roster.len()
    }

    pub fn is_primary(&self, agent_id: &str) -> bool {
        self.state.read().roster.is_primary(agent_id)
    }

    pub fn removal_blocker(&self, agent_id: &str) -> Option<ConflictReason> {
        self.state.read().roster.removal_blocker(agent_id)
    }

    /// Replace the roster with the store's current list.
    ///
    /// This is the explicit full refresh: it applies even if the roster moved
    /// on while the list call was pending.
    pub async fn load(&self) -> Result<Vec<AgentConfig>, SyncError> {
        let agents = match self.store.list().await {
            Ok(agents) => agents,
            Err(err) => {
                warn!(error = %err, "Failed to load agents");
                self.notices.post_failure("Failed to load agents", &err);
                return Err(err);
            }
        };
        let mut state = self.state.write();
        state.roster.replace_all(agents);
        state.converge_selection();
        info!(
            agents = state.roster.len(),
            selection = ?state.selection,
            "Roster loaded"
        );
        Ok(state.roster.agents())
    }

    /// Confirmatory reload after a mutation. Dropped if the roster changed
    /// while the list call was pending; failures are only logged.
    pub(crate) async fn reconcile(&self) {
        let revision = self.state.read().roster.revision();
        match self.store.list().await {
            Ok(agents) => {
                let mut state = self.state.write();
                if state.roster.revision() != revision {
                    debug!(
                        requested_at = revision,
                        current = state.roster.revision(),
                        "Discarding stale roster response"
                    );
                    return;
                }
                state.roster.replace_all(agents);
                state.converge_selection();
            }
            Err(err) => {
                warn!(error = %err, "Confirmatory roster reload failed");
            }
        }
    }

    /// Create an agent: optimistic insert, store call, then confirm or roll back.
    ///
    /// On success the new agent becomes the active selection. On failure the
    /// roster and selection are left as they were before the call.
    pub async fn create(&self, config: AgentConfig) -> Result<AgentConfig, SyncError> {
        let _permit = self.gate.acquire(MutationKind::Create).map_err(|err| {
            debug!(error = %err, "Create rejected");
            err
        })?;
        let result = self.create_held(config).await;
        if let Err(ref err) = result {
            self.notices.post_failure("Failed to create agent", err);
        }
        result
    }

    async fn create_held(&self, config: AgentConfig) -> Result<AgentConfig, SyncError> {
        validate_agent_config(&config).map_err(SyncError::Validation)?;
        let requested = config.agent_id.clone();
        self.state.write().roster.insert_optimistic(config.clone())?;

        let outcome = self.store.create(&config).await;
        let mismatch = {
            let mut state = self.state.write();
            match outcome {
                Ok(confirmed) if confirmed.agent_id == requested => {
                    state.roster.confirm(confirmed.clone());
                    state.selection = Some(requested.clone());
                    info!(agent_id = %requested, name = %confirmed.name, "Agent created");
                    return Ok(confirmed);
                }
                Ok(confirmed) => {
                    Self::rollback_insert(&mut state, &requested);
                    confirmed.agent_id
                }
                Err(err) => {
                    Self::rollback_insert(&mut state, &requested);
                    warn!(agent_id = %requested, error = %err, "Create failed, rolled back");
                    return Err(err);
                }
            }
        };

        warn!(
            requested = %requested,
            assigned = %mismatch,
            "Store reassigned agent id, rolled back optimistic insert"
        );
        self.reconcile().await;
        Err(SyncError::Validation(format!(
            "Store assigned id '{}' to agent created as '{}'",
            mismatch, requested
        )))
    }

    fn rollback_insert(state: &mut EngineState, agent_id: &str) {
        let still_pending = state
            .roster
            .entry(agent_id)
            .map(|entry| !entry.confirmed)
            .unwrap_or(false);
        if still_pending {
            state.roster.remove(agent_id);
            state.converge_selection();
        }
    }

    /// Save `data` for `agent_id`. Never fails loudly: the boolean says whether
    /// the store accepted the save.
    pub async fn update(&self, agent_id: &str, data: AgentConfig) -> bool {
        self.try_update(agent_id, data).await.is_ok()
    }

    /// Save `data` for `agent_id`, reporting why a save did not happen.
    ///
    /// Only one update per agent may be pending; a second one is rejected
    /// with a conflict rather than queued.
    pub async fn try_update(
        &self,
        agent_id: &str,
        data: AgentConfig,
    ) -> Result<AgentConfig, SyncError> {
        let _permit = self.gate.acquire_update(agent_id).map_err(|err| {
            debug!(agent_id, error = %err, "Update rejected");
            err
        })?;
        let result = self.update_held(agent_id, data).await;
        if let Err(ref err) = result {
            self.notices.post_failure("Failed to save agent", err);
        }
        result
    }

    /// Update under a permit the caller already holds.
    pub(crate) async fn update_held(
        &self,
        agent_id: &str,
        mut data: AgentConfig,
    ) -> Result<AgentConfig, SyncError> {
        if !self.contains(agent_id) {
            return Err(SyncError::NotFound(format!("Agent not found: {}", agent_id)));
        }
        data.agent_id = agent_id.to_string();
        validate_agent_config(&data).map_err(SyncError::Validation)?;

        match self.store.update(agent_id, &data).await {
            Ok(confirmed) => {
                let mut state = self.state.write();
                if state.roster.contains(agent_id) {
                    state.roster.confirm(confirmed.clone());
                    debug!(agent_id, "Agent update confirmed");
                } else {
                    debug!(agent_id, "Agent left the roster while its update was pending");
                }
                Ok(confirmed)
            }
            Err(err) => {
                warn!(agent_id, error = %err, "Agent update failed");
                Err(err)
            }
        }
    }

    /// Delete an agent, then reconcile the roster with the store.
    ///
    /// If the deleted agent was selected, the selection moves to the first
    /// remaining agent by creation order (or none).
    pub async fn delete(&self, agent_id: &str) -> Result<(), SyncError> {
        let _permit = self.gate.acquire(MutationKind::Delete).map_err(|err| {
            debug!(agent_id, error = %err, "Delete rejected");
            err
        })?;
        let result = self.delete_held(agent_id).await;
        if let Err(ref err) = result {
            self.notices.post_failure("Failed to remove agent", err);
        }
        result
    }

    async fn delete_held(&self, agent_id: &str) -> Result<(), SyncError> {
        {
            let state = self.state.read();
            if !state.roster.contains(agent_id) {
                return Err(SyncError::NotFound(format!("Agent not found: {}", agent_id)));
            }
            if let Some(reason) = state.roster.removal_blocker(agent_id) {
                return Err(SyncError::Conflict(reason));
            }
        }

        self.store.delete(agent_id).await?;

        {
            let mut state = self.state.write();
            state.roster.remove(agent_id);
            state.converge_selection();
            info!(agent_id, selection = ?state.selection, "Agent removed");
        }

        self.reconcile().await;
        Ok(())
    }

    /// Commit `agent_id` as the selection and return its stored values.
    ///
    /// Returns `None` (and leaves the selection alone) if the agent is no
    /// longer in the roster.
    pub(crate) fn commit_selection(&self, agent_id: &str) -> Option<AgentConfig> {
        let mut state = self.state.write();
        let stored = state.roster.get(agent_id).cloned()?;
        state.selection = Some(agent_id.to_string());
        Some(stored)
    }

    /// Acquire the gate for a switch; its implied save runs under this permit.
    pub(crate) fn begin_switch(&self) -> Result<MutationPermit, SyncError> {
        self.gate.acquire(MutationKind::Switch)
    }
}
