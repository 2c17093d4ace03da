//! Readiness waits and navigation tracking.

mod navigation;
mod wait;

pub use navigation::{
    ChannelNavigation, NavigationEvent, NavigationKind, NavigationSource, SessionState,
    SessionTracker,
};
pub use wait::wait_until;

use std::time::Duration;

use tracing::debug;

use crate::code::has_editor;
use crate::core::{ExtractorConfig, Page};
use crate::snapshot::Snapshot;

/// True once the snapshot carries a problem or submission, or the editor is rendered.
pub fn page_ready<P: Page + ?Sized>(page: &P) -> bool {
    let doc = page.document();
    let from_snapshot = Snapshot::read(&doc)
        .is_some_and(|s| s.problem().is_some() || s.submission().is_some());
    from_snapshot || has_editor(&doc)
}

/// Waits up to `timeout` for [`page_ready`]. Never fails: `false` means the
/// caller proceeds with whatever the page has.
pub async fn wait_for_stability<P: Page + ?Sized>(
    page: &P,
    config: &ExtractorConfig,
    timeout: Duration,
) -> bool {
    let ready = wait_until(page.mutations(), config.poll_interval, timeout, || {
        page_ready(page)
    })
    .await;
    debug!(ready, timeout_ms = timeout.as_millis(), "stability wait finished");
    ready
}
