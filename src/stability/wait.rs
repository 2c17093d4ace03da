use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, sleep, sleep_until};

const MIN_POLL: Duration = Duration::from_millis(1);

enum Wake {
    Deadline,
    Tick,
    Mutation { closed: bool },
}

async fn next_mutation(rx: &mut Option<watch::Receiver<u64>>) -> bool {
    match rx {
        Some(rx) => rx.changed().await.is_err(),
        None => std::future::pending().await,
    }
}

/// Resolves `true` once `predicate` holds, `false` once `timeout` elapses.
///
/// The predicate is re-evaluated on every poll tick and on every mutation
/// notification. The mutation subscription is released on both exits.
pub async fn wait_until<F>(
    mutations: Option<watch::Receiver<u64>>,
    poll: Duration,
    timeout: Duration,
    mut predicate: F,
) -> bool
where
    F: FnMut() -> bool,
{
    if predicate() {
        return true;
    }
    let deadline = Instant::now() + timeout;
    let poll = poll.max(MIN_POLL);
    let mut mutations = mutations;

    loop {
        let wake = tokio::select! {
            biased;
            () = sleep_until(deadline) => Wake::Deadline,
            closed = next_mutation(&mut mutations) => Wake::Mutation { closed },
            () = sleep(poll) => Wake::Tick,
        };
        match wake {
            Wake::Deadline => return false,
            Wake::Mutation { closed: true } => mutations = None,
            Wake::Mutation { closed: false } | Wake::Tick => {}
        }
        if predicate() {
            return true;
        }
    }
}
