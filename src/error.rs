//! Error types for the agent console.
//!
//! Every failure in the synchronization core maps onto one of three kinds:
//! transport failures, validation rejections and local conflicts. None of them
//! are fatal; callers are expected to surface or swallow them and carry on.

use crate::types::AgentId;
use std::fmt;
use thiserror::Error;

/// Structural mutation kinds guarded by the mutation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    Switch,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
            MutationKind::Switch => "switch",
        };
        f.write_str(name)
    }
}

/// Why a request was rejected locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictReason {
    /// Another structural mutation is outstanding.
    MutationInFlight(MutationKind),
    /// An update for this agent is still pending.
    UpdatePending(AgentId),
    /// A tab switch is still resolving.
    SwitchInFlight,
    /// The agent is the last one in the roster.
    SoleAgent(AgentId),
    /// The agent is the default agent.
    DefaultAgent(AgentId),
    /// The agent id is already present in the roster.
    DuplicateAgent(AgentId),
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::MutationInFlight(kind) => {
                write!(f, "a {} is already in progress", kind)
            }
            ConflictReason::UpdatePending(id) => {
                write!(f, "an update for agent '{}' is already pending", id)
            }
            ConflictReason::SwitchInFlight => f.write_str("a switch is already in progress"),
            ConflictReason::SoleAgent(id) => {
                write!(f, "agent '{}' is the only remaining agent", id)
            }
            ConflictReason::DefaultAgent(id) => {
                write!(f, "agent '{}' is the default agent and cannot be removed", id)
            }
            ConflictReason::DuplicateAgent(id) => {
                write!(f, "agent '{}' already exists in the roster", id)
            }
        }
    }
}

/// Errors surfaced by the store adapters, the sync engine and the console.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(ConflictReason),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SyncError {
    /// Conflicts are resolved locally; everything else is worth a notification.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, SyncError::Conflict(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, SyncError::Conflict(_))
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SyncError::Validation(format!("Malformed store response: {}", err))
        } else {
            SyncError::Transport(err.to_string())
        }
    }
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::Config(err.to_string())
    }
}
