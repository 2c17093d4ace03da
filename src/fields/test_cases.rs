use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{PageView, Strategy, first_hit};
use crate::core::TestCases;

#[allow(clippy::expect_used)]
static TALLY_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        r"(?i)(\d+)\s*/\s*(\d+)\s+testcases?\s+passed",
        r"(?i)(\d+)\s*/\s*(\d+)\s+test\s+cases?\s+passed",
        r"(?i)Accepted\s+(\d+)\s*/\s*(\d+)",
        r"(?i)(\d+)\s+out\s+of\s+(\d+)\s+test\s+cases?\s+passed",
    ]
    .map(|p| Regex::new(p).expect("valid regex"))
});

#[allow(clippy::expect_used)]
static BARE_FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*/\s*(\d+)").expect("valid regex"));

fn tally(caps: &Captures<'_>) -> Option<TestCases> {
    Some(TestCases {
        passed: caps.get(1)?.as_str().parse().ok()?,
        total: caps.get(2)?.as_str().parse().ok()?,
    })
}

fn from_page_text(view: &PageView<'_>) -> Option<TestCases> {
    let text = view.text();
    TALLY_PATTERNS
        .iter()
        .find_map(|re| re.captures(text).as_ref().and_then(tally))
}

/// Any `div`/`span` whose text mentions "test" and contains an `n/m` fraction.
fn from_blocks(view: &PageView<'_>) -> Option<TestCases> {
    view.doc.select("div, span").nodes().iter().find_map(|node| {
        let text = node.text();
        if !text.to_lowercase().contains("test") {
            return None;
        }
        BARE_FRACTION.captures(&text).as_ref().and_then(tally)
    })
}

const STRATEGIES: [Strategy<TestCases>; 2] =
    [("page text", from_page_text), ("blocks", from_blocks)];

/// Passed/total test cases; `{0, 0}` when the page shows no tally.
#[must_use]
pub fn extract_test_cases(view: &PageView<'_>) -> TestCases {
    first_hit("testCases", view, &STRATEGIES).unwrap_or_default()
}
