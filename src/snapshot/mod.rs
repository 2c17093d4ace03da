//! Reader for the JSON data island the host page's server renderer embeds.
//!
//! The snapshot is authoritative whenever it is present. Every accessor
//! returns `None` on absence or malformed data; nothing here fails loudly.

mod helpers;
mod wire;

pub(crate) use helpers::truncate;

use dom_query::Document;
use serde_json::Value;
use tracing::{debug, trace};

use crate::core::Difficulty;
use helpers::{find_page_props_in_value, query_cache_data, truthy, truthy_str};
use wire::{ProblemNode, SubmissionNode, TopicTagNode, lang_label};

const SNAPSHOT_SELECTOR: &str = "script#__NEXT_DATA__";
const JSON_SCRIPT_SELECTOR: &str = r#"script[type="application/json"]"#;

const PROBLEM_CANDIDATES: [&str; 3] = ["questionData", "question", "dehydratedState"];
const SUBMISSION_CANDIDATES: [&str; 3] = ["submissionDetails", "submissionData", "dehydratedState"];

/// Problem data as found in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProblemSnapshot {
    pub title: Option<String>,
    /// Statement HTML.
    pub content: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// Topic names in source order; `None` when the payload has no tag list.
    pub tags: Option<Vec<String>>,
}

/// Submission data normalized to one shape, whatever field names the payload used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionSnapshot {
    pub code: String,
    pub lang: Option<String>,
}

/// The parsed data island.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    root: Value,
}

impl Snapshot {
    /// Locates and parses the data island of `doc`.
    ///
    /// Tries the well-known `__NEXT_DATA__` script first, then any JSON
    /// script carrying a `props.pageProps` envelope.
    #[must_use]
    pub fn read(doc: &Document) -> Option<Self> {
        let island = doc.select(SNAPSHOT_SELECTOR);
        if !island.is_empty() {
            let text = island.first().text();
            if let Some(snap) = Self::from_json(&text) {
                return Some(snap);
            }
        }

        for node in doc.select(JSON_SCRIPT_SELECTOR).nodes() {
            let text = node.text();
            let Ok(val) = serde_json::from_str::<Value>(&text) else {
                continue;
            };
            if let Some(pp) = find_page_props_in_value(&val) {
                trace!("snapshot found in generic JSON script");
                let root = serde_json::json!({ "props": { "pageProps": pp.clone() } });
                return Some(Self { root });
            }
        }
        None
    }

    /// Parses a raw data-island payload. Malformed JSON yields `None`.
    #[must_use]
    pub fn from_json(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(root) => Some(Self { root }),
            Err(e) => {
                debug!(error = %e, preview = %truncate(raw, 120), "snapshot JSON did not parse");
                None
            }
        }
    }

    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    fn page_props(&self) -> Option<&Value> {
        self.root
            .get("props")
            .and_then(|p| p.get("pageProps"))
            .filter(|pp| pp.is_object())
    }

    /// First object under the known page-prop paths that carries a title
    /// and statement, directly or inside a dehydrated query cache.
    #[must_use]
    pub fn problem(&self) -> Option<ProblemSnapshot> {
        let page_props = self.page_props()?;
        let candidates = PROBLEM_CANDIDATES
            .iter()
            .filter_map(|k| page_props.get(*k))
            .chain(std::iter::once(page_props));

        for c in candidates {
            if let Some(found) = match_problem(c) {
                return Some(problem_from_node(found));
            }
        }
        None
    }

    /// First object under the known page-prop paths that carries submitted code.
    #[must_use]
    pub fn submission(&self) -> Option<SubmissionSnapshot> {
        let page_props = self.page_props()?;
        for c in SUBMISSION_CANDIDATES.iter().filter_map(|k| page_props.get(*k)) {
            if has_code(c) {
                return submission_from_node(c);
            }
            for data in query_cache_data(c) {
                let s = data
                    .get("submissionDetails")
                    .filter(|s| truthy(Some(*s)))
                    .unwrap_or(data);
                if has_code(s) {
                    return submission_from_node(s);
                }
            }
        }
        None
    }
}

/// Reads the problem payload straight from a document.
#[must_use]
pub fn problem_from_snapshot(doc: &Document) -> Option<ProblemSnapshot> {
    Snapshot::read(doc)?.problem()
}

/// Reads the submission payload straight from a document.
#[must_use]
pub fn submission_from_snapshot(doc: &Document) -> Option<SubmissionSnapshot> {
    Snapshot::read(doc)?.submission()
}

/* ---------------------- internal utilities ---------------------- */

fn match_problem(c: &Value) -> Option<&Value> {
    if truthy(c.get("title")) && truthy(c.get("content")) {
        return Some(c);
    }
    if c.get("queries").is_some_and(Value::is_array) {
        for data in query_cache_data(c) {
            if let Some(q) = data.get("question")
                && truthy(q.get("content"))
            {
                return Some(q);
            }
            if truthy(data.get("content")) && truthy(data.get("title")) {
                return Some(data);
            }
        }
    }
    if let Some(q) = c.get("question")
        && truthy(q.get("content"))
    {
        return Some(q);
    }
    None
}

fn problem_from_node(v: &Value) -> ProblemSnapshot {
    let title = v.get("title").and_then(Value::as_str).map(str::to_string);
    let content = v.get("content").and_then(Value::as_str).map(str::to_string);

    let node = match serde_json::from_value::<ProblemNode>(v.clone()) {
        Ok(n) => Some(n),
        Err(e) => {
            debug!(error = %e, "problem node has unexpected field types");
            None
        }
    };

    let difficulty = node
        .as_ref()
        .and_then(|n| n.difficulty.as_ref())
        .and_then(Value::as_str)
        .and_then(Difficulty::parse);

    let tags = node
        .and_then(|n| n.topic_tags)
        .and_then(|t| match t {
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|it| serde_json::from_value::<TopicTagNode>(it).ok())
                    .filter_map(|t| t.name)
                    .collect(),
            ),
            _ => None,
        });

    ProblemSnapshot {
        title,
        content,
        difficulty,
        tags,
    }
}

fn has_code(v: &Value) -> bool {
    truthy_str(v.get("code")) || truthy_str(v.get("submissionCode"))
}

fn submission_from_node(v: &Value) -> Option<SubmissionSnapshot> {
    let node = serde_json::from_value::<SubmissionNode>(v.clone()).ok()?;
    let code = [node.code, node.submission_code]
        .into_iter()
        .flatten()
        .find_map(|c| c.as_str().filter(|s| !s.is_empty()).map(str::to_string))?;
    let lang = [node.lang, node.language, node.lang_slug]
        .iter()
        .flatten()
        .find_map(lang_label);
    Some(SubmissionSnapshot { code, lang })
}
