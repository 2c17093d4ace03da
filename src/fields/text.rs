//! Text and visibility helpers over `dom_query` nodes.

use dom_query::{Document, NodeRef, Selection};

const SKIPPED_TAGS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

const BLOCK_TAGS: [&str; 24] = [
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "footer", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "header", "li", "main", "nav", "ol", "p", "pre", "section",
];

fn tag_of(node: &NodeRef) -> String {
    node.node_name()
        .map(|t| t.to_ascii_lowercase())
        .unwrap_or_default()
}

fn push_text(node: &NodeRef, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            out.push_str(&child.text());
            continue;
        }
        if !child.is_element() {
            continue;
        }
        let tag = tag_of(&child);
        if SKIPPED_TAGS.contains(&tag.as_str()) {
            continue;
        }
        if tag == "br" {
            out.push('\n');
            continue;
        }
        let block = BLOCK_TAGS.contains(&tag.as_str()) || tag == "tr";
        if block && !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        push_text(&child, out);
        if block && !out.ends_with('\n') {
            out.push('\n');
        }
    }
}

/// Rendered-ish text of the page body: script and style content dropped,
/// block elements on their own lines.
#[must_use]
pub fn page_text(doc: &Document) -> String {
    let body = doc.select("body");
    let root = if body.is_empty() { doc.select("html") } else { body };
    let mut out = String::new();
    if let Some(node) = root.nodes().first() {
        push_text(node, &mut out);
    }
    out
}

/// Text content of a selection with whitespace runs collapsed and trimmed.
#[must_use]
pub fn squashed_text(sel: &Selection) -> String {
    sel.text().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn hides(style: &str) -> bool {
    style.split(';').any(|decl| {
        let Some((prop, value)) = decl.split_once(':') else {
            return false;
        };
        let prop = prop.trim().to_ascii_lowercase();
        let value = value.trim().to_ascii_lowercase();
        let value = value.trim_end_matches("!important").trim();
        (prop == "display" && value == "none") || (prop == "visibility" && value == "hidden")
    })
}

/// True if the node or one of its ancestors is hidden by the `hidden`
/// attribute or an inline `display:none` / `visibility:hidden`.
#[must_use]
pub fn is_hidden(node: &NodeRef) -> bool {
    let mut current = Some(*node);
    while let Some(n) = current {
        if n.is_element() {
            let sel = Selection::from(n);
            if sel.has_attr("hidden") {
                return true;
            }
            if let Some(style) = sel.attr("style")
                && hides(&style)
            {
                return true;
            }
        }
        current = n.parent();
    }
    false
}

/// Nearest ancestor-or-self element with the given tag.
#[must_use]
pub fn closest<'a>(node: &NodeRef<'a>, tag: &str) -> Option<NodeRef<'a>> {
    let mut current = Some(*node);
    while let Some(n) = current {
        if n.is_element() && tag_of(&n) == tag {
            return Some(n);
        }
        current = n.parent();
    }
    None
}

/// Pixel offset from an inline `top:` declaration, e.g. `top: 38px`.
#[must_use]
pub fn inline_top(sel: &Selection) -> Option<i64> {
    let style = sel.attr("style")?;
    style.split(';').find_map(|decl| {
        let (prop, value) = decl.split_once(':')?;
        if !prop.trim().eq_ignore_ascii_case("top") {
            return None;
        }
        let digits: String = value
            .trim()
            .chars()
            .enumerate()
            .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && *c == '-'))
            .map(|(_, c)| c)
            .collect();
        digits.parse::<i64>().ok()
    })
}
