use super::support::agent;
use agentdeck::agent::roster::AgentRoster;
use agentdeck::notice::NoticeBoard;
use agentdeck::error::SyncError;
use agentdeck::store::{MemoryConfigStore, StoreOp};
use agentdeck::sync::SyncEngine;
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Op {
    Create { id: u8, minute: i64, fail: bool },
    Delete { id: u8, fail: bool },
    Reload,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..8, 0i64..120, any::<bool>())
            .prop_map(|(id, minute, fail)| Op::Create { id, minute, fail }),
        (0u8..8, any::<bool>()).prop_map(|(id, fail)| Op::Delete { id, fail }),
        Just(Op::Reload),
    ]
}

fn assert_roster_invariants(ids: &[String], created: &[chrono::DateTime<chrono::Utc>]) {
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len(), "duplicate agent_id in {:?}", ids);
    assert!(
        created.windows(2).all(|w| w[0] <= w[1]),
        "roster not sorted by created_at"
    );
}

proptest! {
    #[test]
    fn create_delete_sequences_never_duplicate_ids(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let store = Arc::new(MemoryConfigStore::with_agents(vec![agent("seed", 0)]));
            let engine = SyncEngine::new(store.clone(), Arc::new(NoticeBoard::new()));
            engine.load().await.unwrap();

            for op in ops {
                match op {
                    Op::Create { id, minute, fail } => {
                        if fail {
                            store.fail_next(StoreOp::Create, SyncError::Transport("down".to_string()));
                        }
                        let _ = engine.create(agent(&format!("a{}", id), minute)).await;
                    }
                    Op::Delete { id, fail } => {
                        if fail {
                            store.fail_next(StoreOp::Delete, SyncError::Transport("down".to_string()));
                        }
                        let _ = engine.delete(&format!("a{}", id)).await;
                    }
                    Op::Reload => {
                        let _ = engine.load().await;
                    }
                }
                // A failure queued for a call rejected locally stays queued for the next one.
                let snapshot = engine.snapshot();
                let created: Vec<_> = snapshot.entries.iter().map(|e| e.config.created_at).collect();
                assert_roster_invariants(&snapshot.ids(), &created);
                assert!(snapshot.entries.iter().all(|e| e.confirmed));
                assert!(!snapshot.ids().is_empty());
                assert!(snapshot.selection.is_some());
            }

            // Whatever happened, a reload agrees with the store.
            engine.load().await.unwrap();
            assert_eq!(engine.roster_len(), store.stored_count());
        });
    }

    #[test]
    fn replace_all_keeps_roster_sorted_and_unique(
        batches in prop::collection::vec(
            prop::collection::vec((0u8..6, 0i64..60), 0..10),
            1..6,
        )
    ) {
        let mut roster = AgentRoster::new();
        for batch in batches {
            let list = batch
                .into_iter()
                .map(|(id, minute)| agent(&format!("a{}", id), minute))
                .collect();
            roster.replace_all(list);
            let created: Vec<_> = roster.entries().iter().map(|e| e.config.created_at).collect();
            assert_roster_invariants(&roster.ids(), &created);
        }
    }
}
