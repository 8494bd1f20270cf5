//! Selection controller: which agent is active, and the guarded switch.
//!
//! Switching away from an agent saves its edit buffer first. The selection
//! only moves once that save has been confirmed; on failure the operator stays
//! on the current agent with the unsaved edits intact.

use crate::agent::domain::AgentConfig;
use crate::agent::edit_buffer::EditBuffer;
use crate::error::{ConflictReason, MutationKind, SyncError};
use crate::notice::Notice;
use crate::sync::SyncEngine;
use crate::types::AgentId;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

const SWITCH_FAILED_TITLE: &str = "Error";
const SWITCH_FAILED_DESCRIPTION: &str =
    "Failed to save changes. Please correct any errors before switching tabs.";

/// Why the controller is not accepting a switch right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    MutationInFlight(MutationKind),
}

/// Switch state as seen by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchState {
    Idle(Option<AgentId>),
    Switching { from: AgentId, to: AgentId },
    Blocked(BlockReason),
}

/// Result of a switch request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Target was already selected; nothing was saved.
    Unchanged,
    /// Selection moved to the given agent.
    Switched(AgentId),
}

/// Clears the switching marker however the switch ends.
struct SwitchingGuard<'a> {
    slot: &'a Mutex<Option<(AgentId, AgentId)>>,
}

impl Drop for SwitchingGuard<'_> {
    fn drop(&mut self) {
        *self.slot.lock() = None;
    }
}

pub struct SelectionController {
    engine: Arc<SyncEngine>,
    buffer: Mutex<EditBuffer>,
    switching: Mutex<Option<(AgentId, AgentId)>>,
}

impl SelectionController {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self {
            engine,
            buffer: Mutex::new(EditBuffer::new()),
            switching: Mutex::new(None),
        }
    }

    pub fn engine(&self) -> &Arc<SyncEngine> {
        &self.engine
    }

    pub fn state(&self) -> SwitchState {
        if let Some((from, to)) = self.switching.lock().clone() {
            return SwitchState::Switching { from, to };
        }
        match self.engine.gate().in_flight() {
            Some(MutationKind::Switch) | None => SwitchState::Idle(self.engine.selection()),
            Some(kind) => SwitchState::Blocked(BlockReason::MutationInFlight(kind)),
        }
    }

    pub fn selection(&self) -> Option<AgentId> {
        self.engine.selection()
    }

    /// Load the roster and point the edit buffer at the resulting selection.
    pub async fn load(&self) -> Result<Vec<AgentConfig>, SyncError> {
        let agents = self.engine.load().await?;
        self.sync_buffer();
        Ok(agents)
    }

    /// Switch to `to`, saving the current agent's edits first.
    pub async fn request_switch(&self, to: &str) -> Result<SwitchOutcome, SyncError> {
        let Some(from) = self.engine.selection() else {
            // Nothing selected yet, so there is nothing to save.
            let stored = self
                .engine
                .commit_selection(to)
                .ok_or_else(|| SyncError::NotFound(format!("Agent not found: {}", to)))?;
            self.buffer.lock().reset_from(&stored);
            return Ok(SwitchOutcome::Switched(to.to_string()));
        };
        if from == to {
            return Ok(SwitchOutcome::Unchanged);
        }
        if !self.engine.contains(to) {
            return Err(SyncError::NotFound(format!("Agent not found: {}", to)));
        }

        let mut permit = self.engine.begin_switch().map_err(|err| {
            debug!(from = %from, to, error = %err, "Switch rejected");
            err
        })?;
        *self.switching.lock() = Some((from.clone(), to.to_string()));
        let _marker = SwitchingGuard {
            slot: &self.switching,
        };

        let data = self.values_for_save(&from)?;
        permit.track_update(&from)?;
        match self.engine.update_held(&from, data.clone()).await {
            Ok(saved) => {
                let mut buffer = self.buffer.lock();
                if buffer.owner() == Some(from.as_str()) {
                    buffer.settle(&data, &saved);
                }
            }
            Err(err) => {
                warn!(from = %from, to, error = %err, "Save before switch failed");
                if !err.is_conflict() {
                    self.engine
                        .notices()
                        .post(Notice::error(SWITCH_FAILED_TITLE, SWITCH_FAILED_DESCRIPTION));
                }
                return Err(err);
            }
        }

        self.engine.reconcile().await;

        match self.engine.commit_selection(to) {
            Some(stored) => {
                self.buffer.lock().reset_from(&stored);
                info!(from = %from, to, "Switched active agent");
                Ok(SwitchOutcome::Switched(to.to_string()))
            }
            None => {
                // The target disappeared while the save was pending.
                self.sync_buffer();
                Err(SyncError::NotFound(format!("Agent not found: {}", to)))
            }
        }
    }

    /// Values to save for `agent_id`: the edit buffer if it owns that agent,
    /// otherwise the stored copy.
    fn values_for_save(&self, agent_id: &str) -> Result<AgentConfig, SyncError> {
        let pending = self.buffer.lock().pending_save();
        match pending {
            Some((owner, draft)) if owner == agent_id => Ok(draft),
            _ => self
                .engine
                .agent(agent_id)
                .ok_or_else(|| SyncError::NotFound(format!("Agent not found: {}", agent_id))),
        }
    }

    /// Create an agent named after the roster size and select it.
    ///
    /// Unsaved edits do not block this; another mutation in flight does.
    pub async fn add_agent(&self) -> Result<AgentConfig, SyncError> {
        let name = AgentConfig::unnamed(self.engine.roster_len());
        let config = AgentConfig::from_template(name, Utc::now());
        let result = self.engine.create(config).await;
        self.sync_buffer();
        result
    }

    /// Remove an agent. The default agent and the last agent are refused.
    pub async fn remove_agent(&self, agent_id: &str) -> Result<(), SyncError> {
        if let Some(reason) = self.engine.removal_blocker(agent_id) {
            return Err(SyncError::Conflict(reason));
        }
        let result = self.engine.delete(agent_id).await;
        self.sync_buffer();
        result
    }

    /// Save the edit buffer without switching.
    pub async fn save(&self) -> Result<AgentConfig, SyncError> {
        let Some((agent_id, draft)) = self.buffer.lock().pending_save() else {
            return Err(SyncError::NotFound("No agent selected".to_string()));
        };
        if self.switching.lock().is_some() {
            return Err(SyncError::Conflict(ConflictReason::SwitchInFlight));
        }
        let saved = self.engine.try_update(&agent_id, draft.clone()).await?;
        let mut buffer = self.buffer.lock();
        if buffer.owner() == Some(agent_id.as_str()) {
            buffer.settle(&draft, &saved);
        }
        Ok(saved)
    }

    /// Apply an edit to the active agent's buffer.
    ///
    /// Refused while a switch is saving the buffer, since the selection is
    /// about to move and the edit would not be part of that save.
    pub fn edit<F>(&self, apply: F) -> bool
    where
        F: FnOnce(&mut AgentConfig),
    {
        let switching = self.switching.lock();
        if let Some((from, to)) = switching.as_ref() {
            debug!(from = %from, to = %to, "Edit refused during switch");
            return false;
        }
        self.buffer.lock().edit(apply)
    }

    /// Draft values of the active agent
    pub fn draft(&self) -> Option<AgentConfig> {
        self.buffer.lock().values().cloned()
    }

    pub fn is_dirty(&self) -> bool {
        self.buffer.lock().is_dirty()
    }

    /// Take a save made outside the buffer, unless the buffer has its own edits.
    pub fn absorb_saved(&self, saved: &AgentConfig) {
        let mut buffer = self.buffer.lock();
        if buffer.owner() == Some(saved.agent_id.as_str()) && !buffer.is_dirty() {
            buffer.reset_from(saved);
        }
    }

    /// Reset the edit buffer if the selection moved away from its owner.
    pub fn sync_buffer(&self) {
        let selection = self.engine.selection();
        let mut buffer = self.buffer.lock();
        match selection {
            Some(id) if buffer.owner() != Some(id.as_str()) => {
                if let Some(stored) = self.engine.agent(&id) {
                    buffer.reset_from(&stored);
                }
            }
            Some(_) => {}
            None => buffer.clear(),
        }
    }
}
