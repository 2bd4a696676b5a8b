//! Many runs over one compiled email graph.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use mailgraph::{
    build_email_graph, EmailState, RunFault, RunnableConfig, StepStreamExt, END,
};
use tokio_util::sync::CancellationToken;

use crate::common::{deps, mailbox, scripted_generator};

/// **Scenario**: Runs for different emails share the graph but not their state.
#[tokio::test]
async fn concurrent_runs_over_one_graph() {
    let mailbox = mailbox();
    let graph = build_email_graph(deps(&mailbox, Arc::new(scripted_generator(2)))).unwrap();

    let outcomes: Vec<_> = futures::stream::iter(["E1", "E2", "E1"])
        .map(|id| {
            let graph = graph.clone();
            async move {
                graph
                    .stream(EmailState::seed(id), RunnableConfig::default())
                    .final_state()
                    .await
            }
        })
        .buffer_unordered(3)
        .collect()
        .await;

    assert_eq!(outcomes.len(), 3);
    for state in outcomes {
        let state = state.expect("each run emits");
        assert_eq!(state.current_step, END, "{}: {}", state.item_id, state.error);
        assert_eq!(state.follow_ups.len(), 1);
    }
    assert_eq!(mailbox.snapshot().categories.len(), 1);
}

/// **Scenario**: Cancelling a run stops it before the next node with a cancellation error.
#[tokio::test]
async fn cancelled_run_ends_in_error() {
    let mailbox = mailbox();
    let graph = build_email_graph(deps(&mailbox, Arc::new(scripted_generator(3)))).unwrap();
    let cancel = CancellationToken::new();
    let config = RunnableConfig::default()
        .with_cancel(cancel.clone())
        .with_timeout(Duration::from_secs(5));

    let mut stream = graph.stream(EmailState::seed("E1"), config);
    let first = stream.next().await.expect("input event");
    assert!(!first.is_terminal());
    cancel.cancel();

    let rest: Vec<_> = stream.collect().await;
    let last = rest.last().expect("cancellation event");
    assert!(last.is_error());
    assert!(matches!(last.fault, Some(RunFault::Cancelled { .. })));
}
