pub mod config;
pub mod validation;

pub use config::{AgentConfig, AgentPayload, ToolConfig, DEFAULT_ROLE, KNOWN_TOOLS};
pub use validation::validate_agent_config;
