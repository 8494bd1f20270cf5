//! Agent roster: the ordered in-memory set of agent configurations.
//!
//! The roster is a passive aggregate. It never talks to the store itself; the
//! sync engine owns it and feeds it store results. Entries stay sorted by
//! `created_at` and are unique by `agent_id`.

use crate::agent::domain::AgentConfig;
use crate::error::{ConflictReason, SyncError};
use crate::types::AgentId;
use std::collections::HashSet;

/// One roster slot.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub config: AgentConfig,
    /// False while the entry only exists because of an optimistic insert
    pub confirmed: bool,
}

/// Ordered-by-creation set of agent configurations.
#[derive(Debug, Default)]
pub struct AgentRoster {
    entries: Vec<RosterEntry>,
    revision: u64,
    loaded: bool,
}

impl AgentRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a full list from the store has been applied at least once
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Bumped on every mutation; used to detect responses that raced a newer view
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, agent_id: &str) -> bool {
        self.position(agent_id).is_some()
    }

    pub fn get(&self, agent_id: &str) -> Option<&AgentConfig> {
        self.position(agent_id).map(|idx| &self.entries[idx].config)
    }

    pub fn entry(&self, agent_id: &str) -> Option<&RosterEntry> {
        self.position(agent_id).map(|idx| &self.entries[idx])
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// First agent by creation time
    pub fn first(&self) -> Option<&AgentConfig> {
        self.entries.first().map(|entry| &entry.config)
    }

    pub fn ids(&self) -> Vec<AgentId> {
        self.entries
            .iter()
            .map(|entry| entry.config.agent_id.clone())
            .collect()
    }

    /// Clone of the configurations in display order
    pub fn agents(&self) -> Vec<AgentConfig> {
        self.entries.iter().map(|entry| entry.config.clone()).collect()
    }

    /// Append an unconfirmed entry ahead of the store round trip.
    pub fn insert_optimistic(&mut self, config: AgentConfig) -> Result<(), SyncError> {
        if self.contains(&config.agent_id) {
            return Err(SyncError::Conflict(ConflictReason::DuplicateAgent(
                config.agent_id,
            )));
        }
        tracing::debug!(agent_id = %config.agent_id, "Optimistic roster insert");
        self.entries.push(RosterEntry {
            config,
            confirmed: false,
        });
        self.sort();
        self.revision += 1;
        Ok(())
    }

    /// Replace (or add) the entry for `config.agent_id` with a store-confirmed copy.
    pub fn confirm(&mut self, config: AgentConfig) {
        match self.position(&config.agent_id) {
            Some(idx) => {
                self.entries[idx] = RosterEntry {
                    config,
                    confirmed: true,
                };
            }
            None => self.entries.push(RosterEntry {
                config,
                confirmed: true,
            }),
        }
        self.sort();
        self.revision += 1;
    }

    /// Reconcile with a full list from the store.
    ///
    /// Duplicate ids in `list` collapse to the last occurrence. Unconfirmed
    /// entries the list does not mention are kept: their create is still in
    /// flight and will confirm or roll back on its own.
    pub fn replace_all(&mut self, list: Vec<AgentConfig>) {
        let mut seen = HashSet::new();
        let mut fresh: Vec<RosterEntry> = Vec::with_capacity(list.len());
        for config in list.into_iter().rev() {
            if seen.insert(config.agent_id.clone()) {
                fresh.push(RosterEntry {
                    config,
                    confirmed: true,
                });
            }
        }
        fresh.reverse();

        let pending: Vec<RosterEntry> = self
            .entries
            .drain(..)
            .filter(|entry| !entry.confirmed && !seen.contains(&entry.config.agent_id))
            .collect();
        fresh.extend(pending);

        self.entries = fresh;
        self.sort();
        self.loaded = true;
        self.revision += 1;
    }

    /// Drop an entry locally.
    pub fn remove(&mut self, agent_id: &str) -> Option<AgentConfig> {
        let idx = self.position(agent_id)?;
        let entry = self.entries.remove(idx);
        self.revision += 1;
        Some(entry.config)
    }

    /// Whether the agent is edited as the primary one: it is flagged default,
    /// or it is the only agent.
    pub fn is_primary(&self, agent_id: &str) -> bool {
        match self.get(agent_id) {
            Some(config) => config.is_default || self.entries.len() == 1,
            None => false,
        }
    }

    /// Reason the agent may not be removed through the standard removal path.
    pub fn removal_blocker(&self, agent_id: &str) -> Option<ConflictReason> {
        let config = self.get(agent_id)?;
        if self.entries.len() <= 1 {
            return Some(ConflictReason::SoleAgent(agent_id.to_string()));
        }
        if config.is_default {
            return Some(ConflictReason::DefaultAgent(agent_id.to_string()));
        }
        None
    }

    fn position(&self, agent_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.config.agent_id == agent_id)
    }

    fn sort(&mut self) {
        // Stable: agents sharing a timestamp keep insertion order.
        self.entries
            .sort_by(|a, b| a.config.created_at.cmp(&b.config.created_at));
    }
}
