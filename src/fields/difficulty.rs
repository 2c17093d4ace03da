use serde_json::Value;

use super::text::{closest, is_hidden};
use super::{PageView, Strategy, first_hit};
use crate::core::Difficulty;

const MAX_SCAN_DEPTH: usize = 6;

const TITLE_SELECTOR: &str = r#"h1[data-cypress="QuestionTitle"], h1, h2"#;
const BADGE_SELECTOR: &str =
    r#"[data-difficulty], [class*="difficulty"], [class*="Difficulty"], span, div"#;

/// Depth-first search for a `difficulty` property holding Easy/Medium/Hard.
///
/// Arrays and objects both count one level; anything deeper than six levels
/// below `v` is not visited.
#[must_use]
pub fn difficulty_in_value(v: &Value) -> Option<Difficulty> {
    scan(v, 0)
}

fn scan(v: &Value, depth: usize) -> Option<Difficulty> {
    if depth > MAX_SCAN_DEPTH {
        return None;
    }
    match v {
        Value::Array(items) => items.iter().find_map(|it| scan(it, depth + 1)),
        Value::Object(map) => {
            if let Some(d) = map
                .get("difficulty")
                .and_then(Value::as_str)
                .and_then(Difficulty::parse)
            {
                return Some(d);
            }
            map.values().find_map(|child| scan(child, depth + 1))
        }
        _ => None,
    }
}

fn from_snapshot(view: &PageView<'_>) -> Option<Difficulty> {
    view.snapshot.and_then(|s| difficulty_in_value(s.root()))
}

fn from_badge(view: &PageView<'_>) -> Option<Difficulty> {
    let titles = view.doc.select(TITLE_SELECTOR);
    let container = titles
        .nodes()
        .first()
        .and_then(|t| closest(t, "div"))
        .map(dom_query::Selection::from)
        .unwrap_or_else(|| view.doc.select("body"));

    container.select(BADGE_SELECTOR).nodes().iter().find_map(|node| {
        let d = Difficulty::parse(&node.text())?;
        (!is_hidden(node)).then_some(d)
    })
}

const STRATEGIES: [Strategy<Difficulty>; 2] = [("snapshot", from_snapshot), ("badge", from_badge)];

/// Difficulty from the snapshot tree, else a visible badge near the title.
#[must_use]
pub fn extract_difficulty(view: &PageView<'_>) -> Difficulty {
    first_hit("difficulty", view, &STRATEGIES).unwrap_or(Difficulty::Unknown)
}
