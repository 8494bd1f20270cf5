use super::support::{agent, default_agent, loaded_console};
use agentdeck::agent::domain::AgentConfig;
use agentdeck::console::AgentConsole;
use agentdeck::config::FeatureGateConfig;
use agentdeck::error::{ConflictReason, SyncError};
use agentdeck::provider::{ModelProviderConfig, ProviderType};
use agentdeck::store::{MemoryConfigStore, StoreOp};
use std::sync::Arc;

fn ids(console: &AgentConsole) -> Vec<String> {
    console.engine().snapshot().ids()
}

#[tokio::test]
async fn switch_keeps_roster_order() {
    let (_store, console) = loaded_console(vec![agent("b", 2), agent("a", 1)]).await;
    assert_eq!(console.selection().selection().as_deref(), Some("a"));

    console.switch_to("b").await.unwrap();
    assert_eq!(console.selection().selection().as_deref(), Some("b"));
    assert_eq!(ids(&console), vec!["a", "b"]);
}

#[tokio::test]
async fn add_agent_in_single_agent_mode_keeps_previous_agent() {
    let store = Arc::new(MemoryConfigStore::with_agents(vec![agent("a", 1)]));
    store.set_model_provider(ModelProviderConfig::new(ProviderType::Anthropic, "claude"));
    let console = AgentConsole::new(store.clone(), &FeatureGateConfig::default());
    console.load().await.unwrap();

    let created = console.add_agent().await.unwrap();
    let snapshot = console.snapshot();
    assert!(!snapshot.show_tabs);
    assert_eq!(snapshot.active, Some(created.agent_id.clone()));
    assert_eq!(snapshot.agents.len(), 2);
    assert_eq!(snapshot.agents[0].agent_id, "a");
    assert!(snapshot.agents.iter().all(|a| a.primary && !a.removable));
    assert_eq!(store.stored_count(), 2);
}

#[tokio::test]
async fn delete_active_agent_moves_selection() {
    let (_store, console) = loaded_console(vec![agent("a", 1), agent("b", 2)]).await;
    console.remove_agent("a").await.unwrap();
    assert_eq!(ids(&console), vec!["b"]);
    assert_eq!(console.selection().selection().as_deref(), Some("b"));
    assert_eq!(console.selection().draft().unwrap().agent_id, "b");
}

#[tokio::test]
async fn removing_the_only_agent_is_rejected() {
    let (store, console) = loaded_console(vec![agent("a", 1)]).await;
    let err = console.remove_agent("a").await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Conflict(ConflictReason::SoleAgent(ref id)) if id == "a"
    ));
    assert_eq!(console.engine().roster_len(), 1);
    assert_eq!(store.calls(StoreOp::Delete), 0);
}

#[tokio::test]
async fn default_agent_survives_removal_attempts() {
    let (_store, console) = loaded_console(vec![default_agent(), agent("a", 1)]).await;
    let err = console.remove_agent("default").await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Conflict(ConflictReason::DefaultAgent(_))
    ));
    assert_eq!(ids(&console), vec!["default", "a"]);
}

#[tokio::test]
async fn failed_create_surfaces_notice_and_keeps_state() {
    let (store, console) = loaded_console(vec![agent("a", 1)]).await;
    store.fail_next(
        StoreOp::Create,
        SyncError::Transport("connection refused".to_string()),
    );

    assert!(console.add_agent().await.is_err());
    assert_eq!(ids(&console), vec!["a"]);
    assert_eq!(console.selection().selection().as_deref(), Some("a"));
    let notices = console.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "Failed to create agent");
}

#[tokio::test]
async fn store_normalisation_reaches_the_roster() {
    let (_store, console) = loaded_console(vec![agent("a", 1)]).await;
    let mut bare = AgentConfig::from_template("Bare", chrono::Utc::now());
    bare.payload.tools.clear();

    let created = console.engine().create(bare).await.unwrap();
    let stored = console.engine().agent(&created.agent_id).unwrap();
    assert!(!stored.payload.tools.is_empty());
}

#[tokio::test]
async fn empty_roster_leaves_selection_null() {
    let store = Arc::new(MemoryConfigStore::new());
    let console = AgentConsole::new(store, &FeatureGateConfig::default());
    let snapshot = console.load().await.unwrap();
    assert!(snapshot.agents.is_empty());
    assert_eq!(snapshot.active, None);
    assert!(console.selection().draft().is_none());
}
