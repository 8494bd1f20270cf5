//! Agents: configuration records, the roster, and the active selection.
//!
//! The roster is the client-side view of every agent the store knows about.
//! Exactly one agent is selected at a time, and only the selected agent has an
//! edit buffer.

pub mod domain;
pub mod edit_buffer;
pub mod roster;
pub mod selection;

pub use domain::{validate_agent_config, AgentConfig, AgentPayload, ToolConfig};
pub use edit_buffer::EditBuffer;
pub use roster::{AgentRoster, RosterEntry};
pub use selection::{BlockReason, SelectionController, SwitchOutcome, SwitchState};
