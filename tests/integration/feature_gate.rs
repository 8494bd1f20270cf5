use agentdeck::config::FeatureGateConfig;
use agentdeck::error::SyncError;
use agentdeck::feature_gate::FeatureGate;
use agentdeck::provider::{ModelProviderConfig, ProviderType};
use agentdeck::store::{MemoryConfigStore, StoreOp};
use std::sync::Arc;
use std::time::Duration;

fn gate(model: &str, config: FeatureGateConfig) -> (Arc<MemoryConfigStore>, FeatureGate) {
    let store = Arc::new(MemoryConfigStore::new());
    store.set_model_provider(ModelProviderConfig::new(ProviderType::Mistral, model));
    let gate = FeatureGate::new(store.clone(), &config);
    (store, gate)
}

#[tokio::test(start_paused = true)]
async fn recheck_after_freshness_window_picks_up_changes() {
    let (store, gate) = gate("mistral-large-latest", FeatureGateConfig::default());
    assert!(gate.is_multi_agent_supported().await);

    store.set_model_provider(ModelProviderConfig::new(ProviderType::Mistral, "open-mistral-7b"));
    assert!(gate.is_multi_agent_supported().await, "fresh answer is cached");

    tokio::time::advance(Duration::from_secs(301)).await;
    assert!(!gate.is_multi_agent_supported().await);
    assert_eq!(store.calls(StoreOp::CheckSupport), 2);
}

#[tokio::test(start_paused = true)]
async fn custom_windows_are_honoured() {
    let config = FeatureGateConfig {
        stale_after_secs: 10,
        expire_after_secs: 20,
    };
    let (store, gate) = gate("mistral-large-latest", config);
    assert!(gate.is_multi_agent_supported().await);

    tokio::time::advance(Duration::from_secs(15)).await;
    store.fail_next(StoreOp::CheckSupport, SyncError::Transport("down".to_string()));
    assert!(gate.is_multi_agent_supported().await);

    tokio::time::advance(Duration::from_secs(10)).await;
    store.fail_next(StoreOp::CheckSupport, SyncError::Transport("down".to_string()));
    assert!(!gate.is_multi_agent_supported().await);
    assert_eq!(gate.cached(), None);
}

#[tokio::test]
async fn unknown_provider_configuration_is_unsupported() {
    let store = Arc::new(MemoryConfigStore::new());
    let gate = FeatureGate::new(store, &FeatureGateConfig::default());
    assert!(!gate.is_multi_agent_supported().await);
}
