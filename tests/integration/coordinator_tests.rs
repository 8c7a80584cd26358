//! Full coordinator runs through the public API
//!
//! Each test wires a coordinator to a status board through the watch
//! subscription, with a dispatcher double standing in for the request layer.

use crate::common::{BoardDispatcher, RejectingDispatcher, eventually, selection};
use batchops_rs::{
    BatchCoordinator, CoordinatorConfig, IN_PROGRESS_LABEL, ItemId, ModalContent, Outcome,
    RunPhase, SUCCESS_LABEL, StatusBoard, commands,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(2);

type SuccessCalls = Arc<Mutex<Vec<(Vec<ItemId>, Option<String>)>>>;
type ErrorCalls = Arc<Mutex<Vec<String>>>;

struct Harness {
    dispatcher: Arc<BoardDispatcher>,
    coordinator: BatchCoordinator,
    success_calls: SuccessCalls,
    error_calls: ErrorCalls,
}

fn harness(dispatcher: BoardDispatcher, board: Arc<StatusBoard>) -> Harness {
    let dispatcher = Arc::new(dispatcher);
    let success_calls: SuccessCalls = Arc::new(Mutex::new(Vec::new()));
    let error_calls: ErrorCalls = Arc::new(Mutex::new(Vec::new()));

    let success_sink = success_calls.clone();
    let error_sink = error_calls.clone();
    let coordinator = BatchCoordinator::builder(dispatcher.clone(), commands::delete_item)
        .config(
            CoordinatorConfig::new()
                .with_concurrency(2)
                .with_update_delay(Duration::from_millis(100)),
        )
        .on_success(move |results, combined| {
            success_sink
                .lock()
                .push((results.to_vec(), combined.map(|s| s.to_string())));
        })
        .on_error(move |combined| error_sink.lock().push(combined.to_string()))
        .build();

    let _watcher = coordinator.watch(board.subscribe());

    Harness {
        dispatcher,
        coordinator,
        success_calls,
        error_calls,
    }
}

async fn wait_for_idle(coordinator: &BatchCoordinator) {
    let idle = eventually(WAIT, || async {
        coordinator.run().await.phase == RunPhase::Idle && !coordinator.is_inflight().await
    })
    .await;
    assert!(idle, "coordinator did not return to idle in time");
}

#[tokio::test]
async fn all_success_run_fires_success_once() {
    let board = Arc::new(StatusBoard::new());
    let h = harness(BoardDispatcher::new(board.clone()), board);

    assert!(h.coordinator.start(&selection(&["x", "y", "z"])).await);

    // every item counted before the settled outcome leaves the screen
    let settled = eventually(WAIT, || async {
        let run = h.coordinator.run().await;
        run.phase == RunPhase::Settled && run.completed == 3
    })
    .await;
    assert!(settled, "run did not settle with all items counted");
    assert_eq!(h.coordinator.run().await.outcome, Some(Outcome::Success));

    wait_for_idle(&h.coordinator).await;

    assert_eq!(h.dispatcher.dispatched_count(), 3);
    assert!(
        h.dispatcher
            .dispatched()
            .iter()
            .all(|action| action.operation == "delete")
    );
    assert!(h.error_calls.lock().is_empty());

    let calls = h.success_calls.lock().clone();
    assert_eq!(calls.len(), 1);
    let (mut results, combined) = calls[0].clone();
    results.sort();
    assert_eq!(results, selection(&["x", "y", "z"]));
    assert_eq!(combined, None);
}

#[tokio::test]
async fn partial_failure_fires_both_callbacks() {
    let board = Arc::new(StatusBoard::new());
    let h = harness(
        BoardDispatcher::new(board.clone()).failing("y", "boom"),
        board,
    );

    assert!(h.coordinator.start(&selection(&["x", "y"])).await);
    wait_for_idle(&h.coordinator).await;

    assert_eq!(
        h.error_calls.lock().clone(),
        vec!["1 error(s) occurred: \nboom".to_string()]
    );

    // the surviving result still reaches the success callback, combined error attached
    let calls = h.success_calls.lock().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, selection(&["x"]));
    assert_eq!(
        calls[0].1.as_deref(),
        Some("1 error(s) occurred: \nboom")
    );
}

#[tokio::test]
async fn mixed_outcomes_account_for_every_item() {
    let board = Arc::new(StatusBoard::new());
    let h = harness(
        BoardDispatcher::new(board.clone())
            .failing("b", "first failure")
            .failing("d", "second failure"),
        board,
    );

    assert!(
        h.coordinator
            .start(&selection(&["a", "b", "c", "d", "e"]))
            .await
    );
    wait_for_idle(&h.coordinator).await;

    let errors = h.error_calls.lock().clone();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("2 error(s) occurred: \n"));
    assert!(errors[0].contains("first failure"));
    assert!(errors[0].contains("second failure"));

    let calls = h.success_calls.lock().clone();
    assert_eq!(calls.len(), 1);
    // errors plus successes cover the whole selection
    assert_eq!(calls[0].0.len() + 2, 5);
}

#[tokio::test]
async fn start_rejected_on_empty_or_inflight_selection() {
    let board = Arc::new(StatusBoard::new());
    let h = harness(
        BoardDispatcher::new(board.clone()).with_latency(Duration::from_millis(100)),
        board,
    );

    assert!(!h.coordinator.start(&[]).await);
    assert_eq!(h.dispatcher.dispatched_count(), 0);

    assert!(h.coordinator.start(&selection(&["a"])).await);
    assert!(!h.coordinator.start(&selection(&["b"])).await);
    assert!(!h.coordinator.trigger(&selection(&["b"])).await);

    wait_for_idle(&h.coordinator).await;

    // a finished run re-arms the coordinator
    assert!(h.coordinator.start(&selection(&["b"])).await);
    wait_for_idle(&h.coordinator).await;
    assert_eq!(h.dispatcher.dispatched_count(), 2);
}

#[tokio::test]
async fn cancel_refused_while_inflight() {
    let board = Arc::new(StatusBoard::new());
    let dispatcher = Arc::new(BoardDispatcher::new(board.clone()).with_latency(
        Duration::from_millis(100),
    ));

    let coordinator = BatchCoordinator::builder(dispatcher, commands::delete_item)
        .config(
            CoordinatorConfig::new()
                .with_concurrency(2)
                .with_update_delay(Duration::from_millis(50)),
        )
        .confirm_prompt(|n| format!("Delete {} item(s)?", n))
        .build();
    let _watcher = coordinator.watch(board.subscribe());

    // before anything runs, cancel simply closes the modal
    assert!(coordinator.trigger(&selection(&["a", "b"])).await);
    let run = coordinator.run().await;
    assert_eq!(run.phase, RunPhase::AwaitingConfirmation);
    assert!(run.modal_visible);

    assert!(coordinator.cancel().await);
    let run = coordinator.run().await;
    assert_eq!(run.phase, RunPhase::Idle);
    assert!(!run.modal_visible);

    // once confirmed, callbacks are outstanding and cancel is refused
    assert!(coordinator.trigger(&selection(&["a", "b"])).await);
    assert!(coordinator.confirm().await);
    assert!(coordinator.is_inflight().await);
    assert!(!coordinator.cancel().await);

    let idle = eventually(WAIT, || async {
        coordinator.run().await.phase == RunPhase::Idle && !coordinator.is_inflight().await
    })
    .await;
    assert!(idle);
    assert!(coordinator.cancel().await);
}

#[tokio::test]
async fn modal_options_provider_blocks_start() {
    let board = Arc::new(StatusBoard::new());
    let dispatcher = Arc::new(BoardDispatcher::new(board.clone()));

    let coordinator = BatchCoordinator::builder(dispatcher.clone(), commands::delete_item)
        .confirm_prompt(|n| format!("Delete {} item(s)?", n))
        .modal_options(|selected| {
            Some(ModalContent::Custom(serde_json::json!({
                "warning": format!("{} items have granules attached", selected.len()),
            })))
        })
        .build();
    let _watcher = coordinator.watch(board.subscribe());

    assert!(coordinator.trigger(&selection(&["a", "b"])).await);
    assert!(!coordinator.confirm().await);

    // the custom body took over and nothing was dispatched
    assert_eq!(dispatcher.dispatched_count(), 0);
    assert_eq!(
        coordinator.run().await.phase,
        RunPhase::AwaitingConfirmation
    );
    assert!(coordinator.modal_snapshot().await.content.is_custom());

    // cancel clears the custom body along with the modal
    assert!(coordinator.cancel().await);
    assert_eq!(
        coordinator.modal_snapshot().await.content,
        ModalContent::Progress
    );
}

#[tokio::test]
async fn modal_snapshot_tracks_the_lifecycle() {
    let board = Arc::new(StatusBoard::new());
    let dispatcher = Arc::new(BoardDispatcher::new(board.clone()));

    let coordinator = BatchCoordinator::builder(dispatcher, commands::delete_item)
        .config(
            CoordinatorConfig::new()
                .with_concurrency(2)
                .with_update_delay(Duration::from_millis(200)),
        )
        .confirm_prompt(|n| format!("Delete {} item(s)?", n))
        .confirm_options(vec!["This cannot be undone".to_string()])
        .build();
    let _watcher = coordinator.watch(board.subscribe());

    assert!(coordinator.trigger(&selection(&["a", "b"])).await);
    let snapshot = coordinator.modal_snapshot().await;
    assert_eq!(snapshot.title, "Delete 2 item(s)?");
    assert!(snapshot.visible);
    assert!(!snapshot.controls_disabled);
    assert_eq!(
        snapshot.confirm_options,
        vec!["This cannot be undone".to_string()]
    );

    assert!(coordinator.confirm().await);
    let snapshot = coordinator.modal_snapshot().await;
    assert_eq!(snapshot.title, IN_PROGRESS_LABEL);
    assert!(snapshot.controls_disabled);

    let settled = eventually(WAIT, || async {
        coordinator.modal_snapshot().await.title == SUCCESS_LABEL
    })
    .await;
    assert!(settled, "settled label never shown");
    assert_eq!(coordinator.modal_snapshot().await.progress_percent, 100.0);

    let reset = eventually(WAIT, || async {
        !coordinator.modal_snapshot().await.visible
    })
    .await;
    assert!(reset, "modal never reset");
}

#[tokio::test]
async fn rejecting_dispatcher_surfaces_only_errors() {
    let board = Arc::new(StatusBoard::new());
    let error_calls: ErrorCalls = Arc::new(Mutex::new(Vec::new()));
    let success_calls: SuccessCalls = Arc::new(Mutex::new(Vec::new()));

    let error_sink = error_calls.clone();
    let success_sink = success_calls.clone();
    let coordinator = BatchCoordinator::builder(
        Arc::new(RejectingDispatcher::new("backend offline")),
        commands::delete_item,
    )
    .config(CoordinatorConfig::new().with_update_delay(Duration::from_millis(50)))
    .on_error(move |combined| error_sink.lock().push(combined.to_string()))
    .on_success(move |results, combined| {
        success_sink
            .lock()
            .push((results.to_vec(), combined.map(|s| s.to_string())));
    })
    .build();
    let _watcher = coordinator.watch(board.subscribe());

    assert!(coordinator.start(&selection(&["a", "b"])).await);

    let idle = eventually(WAIT, || async {
        coordinator.run().await.phase == RunPhase::Idle && !coordinator.is_inflight().await
    })
    .await;
    assert!(idle);

    let errors = error_calls.lock().clone();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("2 error(s) occurred: \n"));
    assert!(success_calls.lock().is_empty());
}
