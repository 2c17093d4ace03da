use std::sync::LazyLock;

use regex::Regex;

use super::text::squashed_text;
use super::{PageView, Strategy, first_hit};
use crate::core::UNKNOWN;

const LABEL_SELECTOR: &str = r#"button, span, div[class*="text"]"#;

/// Languages looked for in free page text, most specific first.
const TEXT_LANGUAGES: [&str; 15] = [
    "Python3",
    "Python",
    "Java",
    "JavaScript",
    "C++",
    "C",
    "C#",
    "Ruby",
    "Go",
    "Rust",
    "Swift",
    "Kotlin",
    "TypeScript",
    "PHP",
    "Scala",
];

#[allow(clippy::expect_used)]
static LANGUAGE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(Python|Python3|Java|JavaScript|C\+\+|C|C#|Ruby|Go|Rust|Swift|Kotlin|TypeScript|PHP|Scala|cpp|js|py)$",
    )
    .expect("valid regex")
});

/// Per language: "Code <lang>" / "Solution <lang>" anywhere, or `<lang>` alone on a line.
#[allow(clippy::expect_used)]
static TEXT_PATTERNS: LazyLock<Vec<(&'static str, Regex, Regex)>> = LazyLock::new(|| {
    TEXT_LANGUAGES
        .iter()
        .map(|lang| {
            let esc = regex::escape(lang);
            let near = Regex::new(&format!(r"(?i)(?:Code|Solution)\s+{esc}(?:[^\w+#]|$)"))
                .expect("valid regex");
            let alone = Regex::new(&format!(r"(?m)^{esc}$")).expect("valid regex");
            (*lang, near, alone)
        })
        .collect()
});

/// Canonical spelling of a language label: short slugs are expanded and
/// known names take their usual casing. Anything else passes through.
#[must_use]
pub fn normalize_language(label: &str) -> String {
    match label.to_ascii_lowercase().as_str() {
        "cpp" => "C++".to_string(),
        "js" => "JavaScript".to_string(),
        "py" => "Python".to_string(),
        _ => TEXT_LANGUAGES
            .iter()
            .find(|lang| lang.eq_ignore_ascii_case(label))
            .map_or_else(|| label.to_string(), |lang| (*lang).to_string()),
    }
}

fn from_labels(view: &PageView<'_>) -> Option<String> {
    view.doc
        .select(LABEL_SELECTOR)
        .nodes()
        .iter()
        .find_map(|node| {
            let text = squashed_text(&dom_query::Selection::from(*node));
            LANGUAGE_LABEL
                .is_match(&text)
                .then(|| normalize_language(&text))
        })
}

fn from_query(view: &PageView<'_>) -> Option<String> {
    view.url
        .query_pairs()
        .find(|(k, _)| k == "lang")
        .map(|(_, v)| v.into_owned())
}

fn from_page_text(view: &PageView<'_>) -> Option<String> {
    let text = view.text();
    TEXT_PATTERNS
        .iter()
        .find(|(_, near, alone)| near.is_match(text) || alone.is_match(text))
        .map(|(lang, _, _)| (*lang).to_string())
}

const STRATEGIES: [Strategy<String>; 3] = [
    ("label", from_labels),
    ("query param", from_query),
    ("page text", from_page_text),
];

/// Language label from the editor toolbar, the `lang` query parameter, or page text.
#[must_use]
pub fn extract_language(view: &PageView<'_>) -> String {
    first_hit("language", view, &STRATEGIES).unwrap_or_else(|| UNKNOWN.to_string())
}
