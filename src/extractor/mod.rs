//! Record assembly with navigation-aware restarts.

mod assemble;

use std::sync::{Arc, PoisonError};

use futures::FutureExt;
use futures::stream::{BoxStream, StreamExt};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use crate::code::{quick_recover, recover_code};
use crate::core::{ExtractError, ExtractedRecord, ExtractorConfig, Page};
use crate::stability::{
    NavigationEvent, NavigationKind, NavigationSource, SessionTracker, wait_for_stability,
};
use assemble::{Draft, first_pass, refresh_from_snapshot};

/// Outcome of one attempt against the page.
enum Attempt {
    Done(ExtractedRecord),
    Moved,
}

/// Extracts [`ExtractedRecord`]s from one page context.
///
/// Runs on the same extractor are serialized; a second call waits for the
/// first to finish. A run restarts when its route moves, whether the move
/// is reported by a navigation source or only seen in the page location.
pub struct Extractor<P: Page + ?Sized> {
    page: Arc<P>,
    session: SessionTracker,
    config: ExtractorConfig,
    // Subscribed at build time; drained at every route check.
    navigation: std::sync::Mutex<Option<BoxStream<'static, NavigationEvent>>>,
    run_lock: Mutex<()>,
}

impl<P: Page + ?Sized> std::fmt::Debug for Extractor<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("url", &self.page.url().as_str())
            .field("session", &self.session)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<P: Page + ?Sized> Extractor<P> {
    /// Create a new builder for `page`.
    pub fn builder(page: Arc<P>) -> ExtractorBuilder<P> {
        ExtractorBuilder {
            page,
            config: None,
            session: None,
            navigation: None,
        }
    }

    /// An extractor with default configuration and a fresh session.
    pub fn new(page: Arc<P>) -> Self {
        Self::builder(page).build()
    }

    pub fn page(&self) -> &Arc<P> {
        &self.page
    }

    pub fn session(&self) -> &SessionTracker {
        &self.session
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Best-effort extraction. Hard failures are logged and yield `None`.
    pub async fn extract_all(&self) -> Option<ExtractedRecord> {
        match self.try_extract().await {
            Ok(record) => Some(record),
            Err(e) => {
                error!(error = %e, "extraction failed");
                None
            }
        }
    }

    /// Extracts one record for the current route, restarting whenever a
    /// navigation lands mid-run.
    ///
    /// # Errors
    /// `ExtractError::RouteUnstable` once the route has moved more than
    /// `max_restarts` times.
    #[instrument(level = "info", skip_all, fields(url = %self.page.url()))]
    pub async fn try_extract(&self) -> Result<ExtractedRecord, ExtractError> {
        let _run = self.run_lock.lock().await;
        let mut restarts = 0u32;
        loop {
            match self.attempt().await {
                Attempt::Done(record) => return Ok(record),
                Attempt::Moved if restarts < self.config.max_restarts => {
                    restarts += 1;
                    info!(restarts, "route changed during extraction, restarting");
                }
                Attempt::Moved => {
                    warn!(restarts, "route kept changing, giving up");
                    return Err(ExtractError::RouteUnstable { restarts });
                }
            }
        }
    }

    /// Folds navigation events queued since the last check into the session.
    fn catch_up_navigation(&self) {
        let mut guard = self
            .navigation
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(events) = guard.as_mut() else {
            return;
        };
        let mut ended = false;
        loop {
            match events.next().now_or_never() {
                Some(Some(event)) => self.session.observe(&event),
                Some(None) => {
                    ended = true;
                    break;
                }
                None => break,
            }
        }
        if ended {
            debug!("navigation source closed");
            *guard = None;
        }
    }

    /// Whether the route left `version`/`path` since the attempt began.
    fn route_moved(&self, version: u64, path: &str) -> bool {
        self.catch_up_navigation();
        if self.session.page_version() != version {
            return true;
        }
        let url = self.page.url();
        if url.path() == path {
            return false;
        }
        debug!(from = path, to = url.path(), "location moved without a navigation event");
        if self.session.state().current_path != url.path() {
            self.session
                .observe(&NavigationEvent::new(NavigationKind::Replace, url.path()));
        }
        true
    }

    async fn attempt(&self) -> Attempt {
        let page = self.page.as_ref();
        let config = &self.config;
        self.catch_up_navigation();
        let start_version = self.session.page_version();
        let start_path = page.url().path().to_string();

        sleep(config.settle_delay).await;
        if !wait_for_stability(page, config, config.stability_timeout).await {
            debug!("page never looked ready, extracting anyway");
        }

        let mut draft = first_pass(page);
        if draft.record.code.is_empty() {
            draft.record.code = recover_code(page, config).await;
        }

        if draft.looks_incomplete() {
            debug!(
                difficulty = %draft.record.difficulty,
                name = %draft.record.problem_name,
                description = draft.record.description_html.is_some(),
                "first pass incomplete, retrying"
            );
            sleep(config.retry_delay).await;
            if self.route_moved(start_version, &start_path) {
                return Attempt::Moved;
            }
            wait_for_stability(page, config, config.retry_stability_timeout).await;
            self.retry_pass(&mut draft);
        }

        if self.route_moved(start_version, &start_path) {
            return Attempt::Moved;
        }

        let record = draft.record;
        if !self.session.record_assembled(start_version, record.clone()) {
            return Attempt::Moved;
        }
        info!(
            problem = %record.problem_name,
            difficulty = %record.difficulty,
            status = %record.status,
            "record assembled"
        );
        Attempt::Done(record)
    }

    fn retry_pass(&self, draft: &mut Draft) {
        let page = self.page.as_ref();
        refresh_from_snapshot(page, draft);
        if draft.has_snapshot_code() {
            return;
        }
        if let Some(code) = quick_recover(page, &self.config) {
            debug!(len = code.len(), "code re-read on retry");
            draft.record.code = code;
        }
    }
}

/* ----------------------- Builder ----------------------- */

pub struct ExtractorBuilder<P: Page + ?Sized> {
    page: Arc<P>,
    config: Option<ExtractorConfig>,
    session: Option<SessionTracker>,
    navigation: Option<Arc<dyn NavigationSource>>,
}

impl<P: Page + ?Sized> ExtractorBuilder<P> {
    /// Override the timing configuration.
    pub fn config(mut self, config: ExtractorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Share an existing session, e.g. one already following navigation.
    ///
    /// A shared session is assumed to be fed by its owner, so the page's own
    /// [`Page::navigation`] is then not subscribed.
    pub fn session(mut self, session: SessionTracker) -> Self {
        self.session = Some(session);
        self
    }

    /// Feed route changes from `source` into the session. Default: the
    /// page's own [`Page::navigation`], unless a session is shared.
    pub fn navigation(mut self, source: Arc<dyn NavigationSource>) -> Self {
        self.navigation = Some(source);
        self
    }

    /// Build the extractor. The navigation source, if any, is subscribed
    /// here, so events from this point on are never missed.
    pub fn build(self) -> Extractor<P> {
        let source = match (self.navigation, &self.session) {
            (Some(source), _) => Some(source),
            (None, None) => self.page.navigation(),
            (None, Some(_)) => None,
        };
        let session = self
            .session
            .unwrap_or_else(|| SessionTracker::new(self.page.url().path()));
        Extractor {
            page: self.page,
            session,
            config: self.config.unwrap_or_default(),
            navigation: std::sync::Mutex::new(source.map(|s| s.events())),
            run_lock: Mutex::new(()),
        }
    }
}
