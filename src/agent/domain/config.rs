//! Agent configuration shape owned by the agent domain.

use crate::types::{AgentId, Timestamp, DEFAULT_AGENT_ID};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tools every agent carries an entry for, enabled or not.
pub const KNOWN_TOOLS: &[&str] = &[
    "DuckDuckGo",
    "Wikipedia",
    "OpenAPI",
    "Interpreter",
    "ImageGenerator",
    "QueryEngine",
];

/// Role assigned to agents created from the template.
pub const DEFAULT_ROLE: &str = "Assistant";

/// One agent configuration as stored by the configuration store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Unique identifier, fixed once created
    pub agent_id: AgentId,
    /// Human readable label (not required to be unique)
    pub name: String,
    /// Creation time, used for display ordering only
    pub created_at: Timestamp,
    /// Marks the distinguished default agent
    #[serde(default)]
    pub is_default: bool,
    /// Everything the sync core does not interpret
    #[serde(flatten)]
    pub payload: AgentPayload,
}

/// Configuration payload of an agent: prompts and tool selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentPayload {
    #[serde(default)]
    pub role: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backstory: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Tool name -> tool settings
    #[serde(default)]
    pub tools: BTreeMap<String, ToolConfig>,
}

/// Per-tool settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub config: serde_json::Value,
}

impl AgentPayload {
    /// Payload used for freshly added agents.
    pub fn template() -> Self {
        let mut payload = Self {
            role: DEFAULT_ROLE.to_string(),
            ..Self::default()
        };
        payload.fill_missing_tools();
        payload
    }

    /// Add a disabled entry for every known tool the payload does not mention.
    ///
    /// Returns true when anything was added.
    pub fn fill_missing_tools(&mut self) -> bool {
        let mut added = false;
        for tool in KNOWN_TOOLS {
            if !self.tools.contains_key(*tool) {
                self.tools.insert(tool.to_string(), ToolConfig::default());
                added = true;
            }
        }
        added
    }

    /// Names of tools currently enabled.
    pub fn enabled_tools(&self) -> Vec<&str> {
        self.tools
            .iter()
            .filter(|(_, tool)| tool.enabled)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl AgentConfig {
    /// Build a new agent from the template with a client generated id.
    pub fn from_template(name: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            agent_id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            created_at,
            is_default: false,
            payload: AgentPayload::template(),
        }
    }

    /// The seeded default agent.
    pub fn seeded_default(created_at: Timestamp) -> Self {
        Self {
            agent_id: DEFAULT_AGENT_ID.to_string(),
            name: "Default Agent".to_string(),
            created_at,
            is_default: true,
            payload: AgentPayload::template(),
        }
    }

    /// Name given to the n-th added agent, n counted from the current roster size.
    pub fn unnamed(roster_len: usize) -> String {
        format!("Unnamed Agent {}", roster_len + 1)
    }
}
