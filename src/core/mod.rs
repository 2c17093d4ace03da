//! Core components shared by every extraction stage.
//!
//! - The [`ExtractError`] type.
//! - The [`ExtractedRecord`] model and its field types.
//! - The [`Page`] capability the extractor reads from.
//! - [`ExtractorConfig`], the timing knobs of an extraction run.

/// Extractor configuration and its builder.
pub mod config;
/// The primary error type (`ExtractError`) for the crate.
pub mod error;
/// The extracted record and its field types.
pub mod models;
/// The page capability and the static HTML implementation.
pub mod page;

pub use config::{ExtractorConfig, ExtractorConfigBuilder, SelectAllDelays};
pub use error::ExtractError;
pub use models::{
    Difficulty, ExtractedRecord, Performance, Status, TestCases, UNKNOWN, UNKNOWN_PROBLEM,
};
pub use page::{EditableSurface, EditorInstance, FocusTarget, Page, SelectAllChord, StaticPage};
