//! Per-field DOM heuristics.
//!
//! Each field is an ordered list of pure strategies over a [`PageView`];
//! the first one that returns `Some` wins and the field falls back to its
//! sentinel otherwise. Extractors never fail.

mod difficulty;
mod language;
mod name;
mod performance;
mod status;
mod test_cases;
pub(crate) mod text;

pub use difficulty::{difficulty_in_value, extract_difficulty};
pub use language::{extract_language, normalize_language};
pub use name::{NameSource, ProblemName, extract_problem_name};
pub use performance::extract_performance;
pub use status::extract_status;
pub use test_cases::extract_test_cases;

use std::cell::OnceCell;
use std::fmt::Debug;

use dom_query::Document;
use tracing::{debug, trace};
use url::Url;

use crate::snapshot::Snapshot;

/// Everything a field strategy may look at, borrowed from one page read.
pub struct PageView<'a> {
    pub doc: &'a Document,
    pub url: &'a Url,
    pub snapshot: Option<&'a Snapshot>,
    text: OnceCell<String>,
}

impl<'a> PageView<'a> {
    #[must_use]
    pub fn new(doc: &'a Document, url: &'a Url, snapshot: Option<&'a Snapshot>) -> Self {
        Self {
            doc,
            url,
            snapshot,
            text: OnceCell::new(),
        }
    }

    /// Body text, computed once per view.
    pub fn text(&self) -> &str {
        self.text.get_or_init(|| text::page_text(self.doc))
    }
}

/// A named heuristic.
pub(crate) type Strategy<T> = (&'static str, fn(&PageView<'_>) -> Option<T>);

/// Runs `strategies` in order and returns the first hit.
pub(crate) fn first_hit<T: Debug>(
    field: &'static str,
    view: &PageView<'_>,
    strategies: &[Strategy<T>],
) -> Option<T> {
    for (strategy, run) in strategies {
        if let Some(value) = run(view) {
            debug!(field, strategy, ?value, "field resolved");
            return Some(value);
        }
        trace!(field, strategy, "strategy missed");
    }
    debug!(field, "no strategy matched; using sentinel");
    None
}
