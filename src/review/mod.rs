//! Language-model review of a submission.
//!
//! The record is rendered into a prompt, sent with fixed coaching
//! instructions, and the model's JSON answer is parsed into a [`Critique`].

mod api;
mod model;
mod prompt;

pub use api::{Analyzer, GeminiAnalyzer, GeminiAnalyzerBuilder};
pub use model::{Comparison, Critique, OptimalSolution};
pub use prompt::{SYSTEM_INSTRUCTIONS, build_prompt, strip_html};
