use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder name used when neither the page nor its URL names the problem.
pub const UNKNOWN_PROBLEM: &str = "Unknown Problem";
/// Placeholder for free-form string fields such as the language.
pub const UNKNOWN: &str = "Unknown";

/// Difficulty badge of a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Unknown,
}

impl Difficulty {
    /// Case-insensitive parse of `Easy`, `Medium` or `Hard`, ignoring surrounding whitespace.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict shown on a submission page.
///
/// Serialized as the label the page displays, e.g. `"Wrong Answer"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Status {
    Accepted,
    #[serde(rename = "Wrong Answer")]
    WrongAnswer,
    #[serde(rename = "Time Limit Exceeded")]
    TimeLimitExceeded,
    #[serde(rename = "Runtime Error")]
    RuntimeError,
    #[serde(rename = "Memory Limit Exceeded")]
    MemoryLimitExceeded,
    #[serde(rename = "Compile Error")]
    CompileError,
    #[serde(rename = "Output Limit Exceeded")]
    OutputLimitExceeded,
    #[default]
    Unknown,
}

impl Status {
    /// Every verdict other than `Unknown`, `Accepted` first.
    pub const KNOWN: [Self; 7] = [
        Self::Accepted,
        Self::WrongAnswer,
        Self::TimeLimitExceeded,
        Self::RuntimeError,
        Self::MemoryLimitExceeded,
        Self::CompileError,
        Self::OutputLimitExceeded,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::WrongAnswer => "Wrong Answer",
            Self::TimeLimitExceeded => "Time Limit Exceeded",
            Self::RuntimeError => "Runtime Error",
            Self::MemoryLimitExceeded => "Memory Limit Exceeded",
            Self::CompileError => "Compile Error",
            Self::OutputLimitExceeded => "Output Limit Exceeded",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Test-case tally. `passed <= total` is expected but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestCases {
    pub passed: u32,
    pub total: u32,
}

/// Runtime and memory figures as displayed, e.g. `"12 ms"` and `"57.3%"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub runtime: Option<String>,
    pub memory: Option<String>,
    pub runtime_percentile: Option<String>,
    pub memory_percentile: Option<String>,
}

/// One extracted submission.
///
/// Every field is always present; missing data is carried by the sentinels
/// ([`UNKNOWN_PROBLEM`], [`UNKNOWN`], `0`, `None`, `""`), so the serialized
/// form never omits a key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecord {
    pub problem_name: String,
    pub difficulty: Difficulty,
    pub language: String,
    pub code: String,
    pub status: Status,
    pub test_cases: TestCases,
    pub performance: Performance,
    pub tags: Vec<String>,
    #[serde(rename = "descriptionHTML")]
    pub description_html: Option<String>,
    pub url: String,
    pub timestamp: String,
    #[serde(default)]
    pub notes: String,
}

