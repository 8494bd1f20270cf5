//! Agentdeck: agent configuration console
//!
//! Keeps a client-side roster of agent configurations in sync with a remote
//! configuration store. Creates are applied optimistically and rolled back on
//! failure, switching the active agent saves its pending edits first, and a
//! cached capability check decides whether multi-agent mode is offered at all.

pub mod agent;
pub mod concurrency;
pub mod config;
pub mod console;
pub mod error;
pub mod feature_gate;
pub mod logging;
pub mod notice;
pub mod provider;
pub mod store;
pub mod sync;
pub mod tooling;
pub mod types;

pub use agent::{AgentConfig, SelectionController, SwitchOutcome, SwitchState};
pub use console::{AgentConsole, ConsoleSnapshot};
pub use error::{ConflictReason, MutationKind, SyncError};
pub use store::ConfigStoreClient;
pub use sync::SyncEngine;
