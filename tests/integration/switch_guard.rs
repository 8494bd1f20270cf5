use super::support::{agent, loaded_console};
use agentdeck::agent::selection::{SwitchOutcome, SwitchState};
use agentdeck::error::SyncError;
use agentdeck::store::StoreOp;

#[tokio::test]
async fn failing_edits_keep_selection_and_buffer() {
    let (store, console) = loaded_console(vec![agent("a", 1), agent("b", 2)]).await;
    let selection = console.selection();
    selection.edit(|c| c.payload.backstory = Some("Worked at a newspaper".to_string()));
    let before = selection.draft().unwrap();
    store.fail_next(
        StoreOp::Update,
        SyncError::Validation("system_prompt too long".to_string()),
    );

    assert!(console.switch_to("b").await.is_err());
    assert_eq!(selection.selection().as_deref(), Some("a"));
    assert_eq!(selection.draft().unwrap(), before);
    assert_eq!(selection.state(), SwitchState::Idle(Some("a".to_string())));
    assert_eq!(console.take_notices().len(), 1);

    // A user-initiated retry goes through once the store accepts it.
    let outcome = console.switch_to("b").await.unwrap();
    assert_eq!(outcome, SwitchOutcome::Switched("b".to_string()));
    assert_eq!(
        store.stored("a").unwrap().payload.backstory.as_deref(),
        Some("Worked at a newspaper")
    );
}

#[tokio::test]
async fn succeeding_edits_reset_buffer_to_target() {
    let (store, console) = loaded_console(vec![agent("a", 1), agent("b", 2)]).await;
    let selection = console.selection();
    selection.edit(|c| c.name = "Editor".to_string());

    console.switch_to("b").await.unwrap();
    assert_eq!(selection.selection().as_deref(), Some("b"));
    assert_eq!(selection.draft().unwrap(), store.stored("b").unwrap());
    assert!(!selection.is_dirty());
    assert_eq!(store.stored("a").unwrap().name, "Editor");
}

#[tokio::test]
async fn switch_to_unknown_agent_is_not_found() {
    let (store, console) = loaded_console(vec![agent("a", 1)]).await;
    let err = console.switch_to("ghost").await.unwrap_err();
    assert!(matches!(err, SyncError::NotFound(_)));
    assert_eq!(store.calls(StoreOp::Update), 0);
}

#[tokio::test]
async fn no_automatic_retry_after_failed_save() {
    let (store, console) = loaded_console(vec![agent("a", 1), agent("b", 2)]).await;
    store.fail_next(StoreOp::Update, SyncError::Transport("502 Bad Gateway".to_string()));

    assert!(console.switch_to("b").await.is_err());
    assert_eq!(store.calls(StoreOp::Update), 1);
}
