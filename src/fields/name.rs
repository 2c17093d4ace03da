use std::sync::LazyLock;

use regex::Regex;

use super::text::squashed_text;
use super::{PageView, Strategy, first_hit};
use crate::core::UNKNOWN_PROBLEM;

const HEADING_SELECTORS: [&str; 6] = [
    r#"a[href*="/problems/"]"#,
    ".text-title-large",
    r#"[class*="text-title"]"#,
    "h1",
    "h2",
    "h3",
];

#[allow(clippy::expect_used)]
static NUMBERED_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*(.+)$").expect("valid regex"));

#[allow(clippy::expect_used)]
static PROBLEM_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/problems/([^/]+)/").expect("valid regex"));

/// Where a problem name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    Snapshot,
    Heading,
    UrlSlug,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemName {
    pub text: String,
    pub source: NameSource,
}

fn from_heading(view: &PageView<'_>) -> Option<ProblemName> {
    HEADING_SELECTORS.iter().find_map(|sel| {
        let found = view.doc.select(sel);
        if found.is_empty() {
            return None;
        }
        let text = squashed_text(&found.first());
        if text.is_empty() {
            return None;
        }
        let name = NUMBERED_TITLE
            .captures(&text)
            .and_then(|c| c.get(1))
            .map_or(text.as_str(), |m| m.as_str())
            .trim()
            .to_string();
        Some(ProblemName {
            text: name,
            source: NameSource::Heading,
        })
    })
}

fn title_case(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn from_url_slug(view: &PageView<'_>) -> Option<ProblemName> {
    let slug = PROBLEM_SLUG.captures(view.url.path())?.get(1)?.as_str();
    Some(ProblemName {
        text: title_case(slug),
        source: NameSource::UrlSlug,
    })
}

const STRATEGIES: [Strategy<ProblemName>; 2] =
    [("heading", from_heading), ("url slug", from_url_slug)];

/// Problem title from the page heading, else the URL slug, else `"Unknown Problem"`.
#[must_use]
pub fn extract_problem_name(view: &PageView<'_>) -> ProblemName {
    first_hit("problemName", view, &STRATEGIES).unwrap_or_else(|| ProblemName {
        text: UNKNOWN_PROBLEM.to_string(),
        source: NameSource::Fallback,
    })
}
