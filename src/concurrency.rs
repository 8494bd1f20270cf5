//! Mutual exclusion for structural roster mutations
//!
//! At most one structural mutation (create, update, delete, or a switch with
//! its implied save) may be outstanding at a time. A second request is rejected
//! with a conflict, never queued. Updates are additionally tracked per agent so
//! that a second save for the same agent reports the more specific reason.

use crate::error::{ConflictReason, MutationKind, SyncError};
use crate::types::AgentId;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Default)]
struct GateState {
    /// Structural mutation currently holding the gate
    structural: Option<MutationKind>,
    /// Agents with an update in flight
    updating: HashSet<AgentId>,
}

/// Gate handing out at most one [`MutationPermit`] at a time.
#[derive(Debug, Clone, Default)]
pub struct MutationGate {
    state: Arc<Mutex<GateState>>,
}

impl MutationGate {
    /// Create a new, open gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the gate for a structural mutation.
    pub fn acquire(&self, kind: MutationKind) -> Result<MutationPermit, SyncError> {
        let mut state = self.state.lock();
        if let Some(held) = state.structural {
            return Err(SyncError::Conflict(busy_reason(held)));
        }
        state.structural = Some(kind);
        Ok(MutationPermit {
            state: Arc::clone(&self.state),
            kind,
            tracked: Vec::new(),
        })
    }

    /// Acquire the gate for an update of `agent_id`.
    ///
    /// A pending update for the same agent takes precedence over the
    /// generic in-flight reason.
    pub fn acquire_update(&self, agent_id: &str) -> Result<MutationPermit, SyncError> {
        let mut state = self.state.lock();
        if state.updating.contains(agent_id) {
            return Err(SyncError::Conflict(ConflictReason::UpdatePending(
                agent_id.to_string(),
            )));
        }
        if let Some(held) = state.structural {
            return Err(SyncError::Conflict(busy_reason(held)));
        }
        state.structural = Some(MutationKind::Update);
        state.updating.insert(agent_id.to_string());
        Ok(MutationPermit {
            state: Arc::clone(&self.state),
            kind: MutationKind::Update,
            tracked: vec![agent_id.to_string()],
        })
    }

    /// Kind of the mutation currently holding the gate, if any
    pub fn in_flight(&self) -> Option<MutationKind> {
        self.state.lock().structural
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight().is_some()
    }

    /// Whether an update for this agent is pending
    pub fn is_updating(&self, agent_id: &str) -> bool {
        self.state.lock().updating.contains(agent_id)
    }
}

fn busy_reason(held: MutationKind) -> ConflictReason {
    match held {
        MutationKind::Switch => ConflictReason::SwitchInFlight,
        other => ConflictReason::MutationInFlight(other),
    }
}

/// Scoped ownership of the mutation gate; released on drop on every exit path.
#[derive(Debug)]
pub struct MutationPermit {
    state: Arc<Mutex<GateState>>,
    kind: MutationKind,
    tracked: Vec<AgentId>,
}

impl MutationPermit {
    /// Record that this permit is saving `agent_id`.
    ///
    /// Used by a switch, whose save of the outgoing agent is an update made
    /// under the switch's permit.
    pub fn track_update(&mut self, agent_id: &str) -> Result<(), SyncError> {
        let mut state = self.state.lock();
        if !state.updating.insert(agent_id.to_string()) {
            return Err(SyncError::Conflict(ConflictReason::UpdatePending(
                agent_id.to_string(),
            )));
        }
        self.tracked.push(agent_id.to_string());
        Ok(())
    }
}

impl Drop for MutationPermit {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        for agent_id in self.tracked.drain(..) {
            state.updating.remove(&agent_id);
        }
        if state.structural == Some(self.kind) {
            state.structural = None;
        }
        tracing::trace!(kind = %self.kind, "Released mutation permit");
    }
}
