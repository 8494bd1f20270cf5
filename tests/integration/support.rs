use agentdeck::agent::domain::{AgentConfig, AgentPayload};
use agentdeck::console::AgentConsole;
use agentdeck::config::FeatureGateConfig;
use agentdeck::provider::{ModelProviderConfig, ProviderType};
use agentdeck::store::MemoryConfigStore;
use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

/// Agent created `minutes` after a fixed epoch
pub fn agent(id: &str, minutes: i64) -> AgentConfig {
    let epoch = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    AgentConfig {
        agent_id: id.to_string(),
        name: format!("Agent {}", id),
        created_at: epoch + Duration::minutes(minutes),
        is_default: false,
        payload: AgentPayload::template(),
    }
}

pub fn default_agent() -> AgentConfig {
    let mut default = agent("default", 0);
    default.name = "Default Agent".to_string();
    default.is_default = true;
    default
}

/// Console over a memory store that reports multi-agent support
pub async fn loaded_console(agents: Vec<AgentConfig>) -> (Arc<MemoryConfigStore>, AgentConsole) {
    let store = Arc::new(MemoryConfigStore::with_agents(agents));
    store.set_model_provider(ModelProviderConfig::new(ProviderType::OpenAI, "gpt-4o"));
    let console = AgentConsole::new(store.clone(), &FeatureGateConfig::default());
    console.load().await.unwrap();
    (store, console)
}
