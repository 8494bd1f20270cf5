use super::support::{agent, loaded_console};
use agentdeck::agent::selection::{BlockReason, SwitchState};
use agentdeck::error::{ConflictReason, MutationKind, SyncError};
use agentdeck::store::StoreOp;

#[tokio::test]
async fn second_update_for_same_agent_is_rejected() {
    let (store, console) = loaded_console(vec![agent("a", 1)]).await;
    let engine = console.engine();
    let mut hold = store.hold_next(StoreOp::Update);

    let mut first = agent("a", 1);
    first.payload.goal = Some("first".to_string());
    let mut second = agent("a", 1);
    second.payload.goal = Some("second".to_string());

    let (first_ok, second_result) = tokio::join!(engine.update("a", first), async {
        hold.entered().await;
        let result = engine.try_update("a", second).await;
        hold.release();
        result
    });

    assert!(first_ok);
    assert!(matches!(
        second_result,
        Err(SyncError::Conflict(ConflictReason::UpdatePending(_)))
    ));
    assert_eq!(engine.agent("a").unwrap().payload.goal.as_deref(), Some("first"));
    assert_eq!(store.stored("a").unwrap().payload.goal.as_deref(), Some("first"));
}

#[tokio::test]
async fn add_is_rejected_while_a_switch_save_is_pending() {
    let (store, console) = loaded_console(vec![agent("a", 1), agent("b", 2)]).await;
    let mut hold = store.hold_next(StoreOp::Update);

    let (switched, added) = tokio::join!(console.switch_to("b"), async {
        hold.entered().await;
        let added = console.add_agent().await;
        hold.release();
        added
    });

    switched.unwrap();
    assert!(matches!(
        added,
        Err(SyncError::Conflict(ConflictReason::SwitchInFlight))
    ));
    assert_eq!(console.engine().roster_len(), 2);
    assert_eq!(store.calls(StoreOp::Create), 0);
}

#[tokio::test]
async fn switch_and_remove_are_blocked_during_create() {
    let (store, console) = loaded_console(vec![agent("a", 1), agent("b", 2)]).await;
    let mut hold = store.hold_next(StoreOp::Create);

    let (created, ()) = tokio::join!(console.add_agent(), async {
        hold.entered().await;
        assert_eq!(
            console.selection().state(),
            SwitchState::Blocked(BlockReason::MutationInFlight(MutationKind::Create))
        );
        let switch = console.switch_to("b").await;
        assert!(matches!(
            switch,
            Err(SyncError::Conflict(ConflictReason::MutationInFlight(MutationKind::Create)))
        ));
        let remove = console.remove_agent("b").await;
        assert!(remove.unwrap_err().is_conflict());
        // Optimistic entry is already visible.
        assert_eq!(console.engine().roster_len(), 3);
        hold.release();
    });

    let created = created.unwrap();
    assert_eq!(console.selection().selection(), Some(created.agent_id));
    assert!(!console.engine().gate().is_busy());
}

#[tokio::test]
async fn gate_is_released_after_failures() {
    let (store, console) = loaded_console(vec![agent("a", 1), agent("b", 2)]).await;
    store.fail_next(StoreOp::Delete, SyncError::Transport("reset".to_string()));
    store.fail_next(StoreOp::Create, SyncError::Validation("bad".to_string()));

    assert!(console.remove_agent("b").await.is_err());
    assert!(console.add_agent().await.is_err());
    assert!(!console.engine().gate().is_busy());

    console.remove_agent("b").await.unwrap();
    assert_eq!(console.engine().snapshot().ids(), vec!["a"]);
}
