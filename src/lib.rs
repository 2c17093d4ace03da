//! leetcode-tracker: structured records from a coding-practice submission page.
//!
//! The page is a client-side rendered application that hydrates late and
//! virtualizes its code editor. An [`Extractor`] waits for it to settle,
//! prefers the embedded data snapshot, falls back to DOM heuristics field by
//! field, recovers the editor contents, and restarts if the route changes
//! underneath it.
//!
//! ```no_run
//! use std::sync::Arc;
//! use leetcode_tracker::{Extractor, StaticPage};
//!
//! # async fn run(html: String) -> Result<(), leetcode_tracker::ExtractError> {
//! let page = StaticPage::new("https://leetcode.com/problems/two-sum/submissions/1/", html)?;
//! let extractor = Extractor::new(Arc::new(page));
//! if let Some(record) = extractor.extract_all().await {
//!     println!("{} ({})", record.problem_name, record.difficulty);
//! }
//! # Ok(())
//! # }
//! ```

pub mod code;
pub mod core;
pub mod extractor;
pub mod fields;
pub mod relay;
pub mod review;
pub mod snapshot;
pub mod stability;
pub mod store;

pub use crate::core::{
    Difficulty, EditableSurface, EditorInstance, ExtractError, ExtractedRecord, ExtractorConfig,
    ExtractorConfigBuilder, FocusTarget, Page, Performance, SelectAllChord, SelectAllDelays,
    StaticPage, Status, TestCases, UNKNOWN, UNKNOWN_PROBLEM,
};
pub use extractor::{Extractor, ExtractorBuilder};
pub use relay::{Request, Response};
pub use review::{Analyzer, Comparison, Critique, GeminiAnalyzer, GeminiAnalyzerBuilder, OptimalSolution};
pub use stability::{
    ChannelNavigation, NavigationEvent, NavigationKind, NavigationSource, SessionState,
    SessionTracker,
};
pub use store::{KeyValueStore, MemoryStore, SavedSubmission, SubmissionStore};
