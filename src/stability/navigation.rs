//! Route tracking for the single-page host.
//!
//! Navigation is observed, never intercepted: a [`NavigationSource`] yields
//! events and a [`SessionTracker`] folds each one into a fresh
//! [`SessionState`]. Extraction runs compare `page_version` before and
//! after their reads to detect that the route moved under them.

use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::core::ExtractedRecord;

const EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// A new history entry was pushed.
    Push,
    /// The current history entry was replaced.
    Replace,
    /// The user moved back or forward through history.
    Pop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub kind: NavigationKind,
    /// Path of the route after the transition.
    pub path: String,
}

impl NavigationEvent {
    #[must_use]
    pub fn new(kind: NavigationKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Transient extraction state of one page context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Last observed route path.
    pub current_path: String,
    /// Bumped on every observed navigation; never decreases.
    pub page_version: u64,
    /// Most recent record assembled for the current route.
    pub last_assembled: Option<Arc<ExtractedRecord>>,
}

impl SessionState {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            current_path: path.into(),
            page_version: 0,
            last_assembled: None,
        }
    }

    /// The state after `event`: new path, next version, empty cache.
    #[must_use]
    pub fn navigated(&self, event: &NavigationEvent) -> Self {
        Self {
            current_path: event.path.clone(),
            page_version: self.page_version + 1,
            last_assembled: None,
        }
    }

    /// The state with `record` cached as the latest assembly.
    #[must_use]
    pub fn with_assembled(&self, record: ExtractedRecord) -> Self {
        Self {
            current_path: self.current_path.clone(),
            page_version: self.page_version,
            last_assembled: Some(Arc::new(record)),
        }
    }
}

/// A platform facility that reports route changes.
///
/// Every call to [`events`](Self::events) starts a new, independent stream
/// that runs for as long as the source exists.
pub trait NavigationSource: Send + Sync {
    fn events(&self) -> BoxStream<'static, NavigationEvent>;
}

/// In-process [`NavigationSource`] fed by [`emit`](Self::emit).
#[derive(Debug, Clone)]
pub struct ChannelNavigation {
    tx: broadcast::Sender<NavigationEvent>,
}

impl Default for ChannelNavigation {
    fn default() -> Self {
        let (tx, _) = broadcast::channel(EVENT_BUFFER);
        Self { tx }
    }
}

impl ChannelNavigation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `event` to every open stream. Events emitted while no stream
    /// is open are dropped.
    pub fn emit(&self, event: NavigationEvent) {
        let _ = self.tx.send(event);
    }
}

impl NavigationSource for ChannelNavigation {
    fn events(&self) -> BoxStream<'static, NavigationEvent> {
        let rx = self.tx.subscribe();
        stream::unfold(rx, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(event) => return Some((event, rx)),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "navigation stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
        .boxed()
    }
}

/// Owner of the current [`SessionState`].
#[derive(Debug, Clone)]
pub struct SessionTracker {
    tx: Arc<watch::Sender<SessionState>>,
}

impl SessionTracker {
    #[must_use]
    pub fn new(initial_path: impl Into<String>) -> Self {
        let (tx, _) = watch::channel(SessionState::new(initial_path));
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn page_version(&self) -> u64 {
        self.tx.borrow().page_version
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Folds one navigation event into the state.
    pub fn observe(&self, event: &NavigationEvent) {
        self.tx.send_modify(|state| *state = state.navigated(event));
        info!(
            kind = ?event.kind,
            path = %event.path,
            version = self.page_version(),
            "navigation observed"
        );
    }

    /// Caches `record` if the route is still at `version`. Returns whether it was stored.
    pub fn record_assembled(&self, version: u64, record: ExtractedRecord) -> bool {
        self.tx.send_if_modified(|state| {
            if state.page_version != version {
                return false;
            }
            *state = state.with_assembled(record);
            true
        })
    }

    /// Folds every event of `events` into the state until the stream ends.
    pub async fn follow(&self, mut events: BoxStream<'static, NavigationEvent>) {
        while let Some(event) = events.next().await {
            self.observe(&event);
        }
    }

    /// Subscribes to `source` immediately, then follows it on a background
    /// task. Events emitted after this returns are never missed.
    pub fn spawn_follow<N: NavigationSource + ?Sized>(&self, source: &N) -> JoinHandle<()> {
        let events = source.events();
        let tracker = self.clone();
        tokio::spawn(async move { tracker.follow(events).await })
    }
}
