use serde::{Deserialize, Serialize};

/// Reference solution proposed by the reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimalSolution {
    pub code: String,
    pub language: String,
    pub time_complexity: String,
    pub space_complexity: String,
}

/// How the submitted solution measures against the reference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comparison {
    pub user_time_complexity: String,
    pub user_space_complexity: String,
    pub differences: Vec<String>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

/// Structured review of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Critique {
    pub optimal_solution: OptimalSolution,
    pub comparison: Comparison,
    /// Markdown.
    pub notes: String,
    pub topics: Vec<String>,
}
