//! Agent console: the operator-facing facade over engine, selection and gate.

use crate::agent::domain::AgentConfig;
use crate::agent::selection::{SelectionController, SwitchOutcome, SwitchState};
use crate::config::FeatureGateConfig;
use crate::error::SyncError;
use crate::feature_gate::FeatureGate;
use crate::notice::{Notice, NoticeBoard};
use crate::store::ConfigStoreClient;
use crate::sync::SyncEngine;
use crate::types::{AgentId, Timestamp};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// One agent as presented to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentView {
    pub agent_id: AgentId,
    pub name: String,
    pub role: String,
    pub created_at: Timestamp,
    pub is_default: bool,
    /// Shown as the primary agent
    pub primary: bool,
    /// Offered the remove affordance
    pub removable: bool,
    /// Create not yet confirmed by the store
    pub pending: bool,
    pub active: bool,
}

/// Everything a presentation layer needs to draw the console.
#[derive(Debug, Clone, Serialize)]
pub struct ConsoleSnapshot {
    pub agents: Vec<AgentView>,
    pub active: Option<AgentId>,
    /// None until the capability has been checked
    pub multi_agent: Option<bool>,
    pub show_tabs: bool,
    pub dirty: bool,
    #[serde(skip)]
    pub state: SwitchState,
}

pub struct AgentConsole {
    engine: Arc<SyncEngine>,
    selection: SelectionController,
    features: FeatureGate,
}

impl AgentConsole {
    pub fn new(store: Arc<dyn ConfigStoreClient>, gate_config: &FeatureGateConfig) -> Self {
        let notices = Arc::new(NoticeBoard::new());
        let engine = Arc::new(SyncEngine::new(Arc::clone(&store), notices));
        Self {
            selection: SelectionController::new(Arc::clone(&engine)),
            features: FeatureGate::new(store, gate_config),
            engine,
        }
    }

    pub fn engine(&self) -> &Arc<SyncEngine> {
        &self.engine
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn features(&self) -> &FeatureGate {
        &self.features
    }

    /// Load the roster and check the capability.
    pub async fn load(&self) -> Result<ConsoleSnapshot, SyncError> {
        self.selection.load().await?;
        self.features.is_multi_agent_supported().await;
        Ok(self.snapshot())
    }

    pub async fn refresh_capability(&self) -> bool {
        self.features.is_multi_agent_supported().await
    }

    /// The model provider configuration changed; forget the capability answer.
    pub fn provider_changed(&self) {
        info!("Model provider changed");
        self.features.invalidate();
    }

    pub async fn switch_to(&self, agent_id: &str) -> Result<SwitchOutcome, SyncError> {
        self.selection.request_switch(agent_id).await
    }

    pub async fn add_agent(&self) -> Result<AgentConfig, SyncError> {
        self.selection.add_agent().await
    }

    pub async fn remove_agent(&self, agent_id: &str) -> Result<(), SyncError> {
        self.selection.remove_agent(agent_id).await
    }

    /// Edit and save one agent directly, bypassing the edit buffer.
    pub async fn apply<F>(&self, agent_id: &str, edit: F) -> Result<AgentConfig, SyncError>
    where
        F: FnOnce(&mut AgentConfig),
    {
        let mut data = self
            .engine
            .agent(agent_id)
            .ok_or_else(|| SyncError::NotFound(format!("Agent not found: {}", agent_id)))?;
        edit(&mut data);
        let saved = self.engine.try_update(agent_id, data).await?;
        self.selection.absorb_saved(&saved);
        Ok(saved)
    }

    pub fn take_notices(&self) -> Vec<Notice> {
        self.engine.notices().drain()
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        let roster = self.engine.snapshot();
        let multi_agent = self.features.cached().map(|r| r.supported);
        let multi = multi_agent.unwrap_or(false);
        let sole = roster.entries.len() == 1;

        let agents = roster
            .entries
            .iter()
            .map(|entry| {
                let config = &entry.config;
                AgentView {
                    agent_id: config.agent_id.clone(),
                    name: config.name.clone(),
                    role: config.payload.role.clone(),
                    created_at: config.created_at,
                    is_default: config.is_default,
                    primary: !multi || sole || config.is_default,
                    removable: multi && !sole && !config.is_default,
                    pending: !entry.confirmed,
                    active: roster.selection.as_deref() == Some(config.agent_id.as_str()),
                }
            })
            .collect();

        ConsoleSnapshot {
            agents,
            active: roster.selection,
            multi_agent,
            show_tabs: multi,
            dirty: self.selection.is_dirty(),
            state: self.selection.state(),
        }
    }
}
