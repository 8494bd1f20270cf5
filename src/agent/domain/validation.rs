//! Agent configuration validation owned by the agent domain.

use super::config::{AgentConfig, KNOWN_TOOLS};

/// Validate agent configuration before it is sent to the store.
pub fn validate_agent_config(agent: &AgentConfig) -> Result<(), String> {
    if agent.agent_id.trim().is_empty() {
        return Err("Agent ID cannot be empty".to_string());
    }

    if agent.name.trim().is_empty() {
        return Err(format!("Agent '{}' requires a name", agent.agent_id));
    }

    if agent.payload.role.trim().is_empty() {
        return Err(format!("Agent '{}' requires a role", agent.agent_id));
    }

    if let Some(ref prompt) = agent.payload.system_prompt {
        if prompt.trim().is_empty() {
            return Err("System prompt cannot be empty if provided".to_string());
        }
    }

    if let Some(unknown) = agent
        .payload
        .tools
        .keys()
        .find(|name| !KNOWN_TOOLS.contains(&name.as_str()))
    {
        return Err(format!(
            "Agent '{}' references unknown tool '{}'",
            agent.agent_id, unknown
        ));
    }

    Ok(())
}
