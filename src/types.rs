//! Core types shared across the agent console.

/// AgentId: opaque identifier of an agent configuration, fixed at creation
pub type AgentId = String;

/// Timestamp used for creation ordering
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Identifier of the seeded default agent
pub const DEFAULT_AGENT_ID: &str = "default";
