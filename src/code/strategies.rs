use std::collections::BTreeMap;

use dom_query::{Document, Selection};
use tokio::time::sleep;
use tracing::{debug, trace};

use super::focus::FocusGuard;
use crate::core::config::SelectAllDelays;
use crate::core::{EditableSurface, EditorInstance, Page, SelectAllChord};
use crate::fields::text::inline_top;

const EDITOR_SELECTOR: &str = ".monaco-editor";
const VIEW_LINES_SELECTOR: &str = ".view-lines";
const VIEW_LINE_SELECTOR: &str = ".view-line";
const GUTTER_SELECTOR: &str = r#"[class*="line-numbers"]"#;

fn has_content(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Monaco renders spaces as no-break spaces.
fn line_text(sel: &Selection) -> String {
    sel.text().replace('\u{a0}', " ")
}

/// Strategy 1: the editor's own model. Detached instances are skipped.
pub(crate) fn from_editor_api<P: Page + ?Sized>(page: &P) -> Option<String> {
    let instances = page.editor_instances();
    let live = instances
        .into_iter()
        .filter(|EditorInstance { attached, .. }| *attached)
        .filter_map(|i| i.value)
        .find(|v| has_content(v));
    if live.is_some() {
        return live;
    }
    page.editor_models().into_iter().find(|v| has_content(v))
}

fn view_lines<'a>(doc: &'a Document) -> Option<Selection<'a>> {
    let editor = doc.select(EDITOR_SELECTOR);
    if editor.is_empty() {
        return None;
    }
    let lines = editor.first().select(VIEW_LINES_SELECTOR);
    if lines.is_empty() {
        return None;
    }
    Some(lines.first())
}

/// Rendered lines as `(top, text)`, in DOM order. Lines without an inline
/// offset are dropped.
fn positioned_lines(container: &Selection) -> Vec<(i64, String)> {
    container
        .select(VIEW_LINE_SELECTOR)
        .nodes()
        .iter()
        .filter_map(|node| {
            let sel = Selection::from(*node);
            let top = inline_top(&sel)?;
            Some((top, line_text(&sel)))
        })
        .collect()
}

/// Strategy 2: rendered lines sorted by their vertical offset.
///
/// The virtualized editor recycles line elements, so DOM order is not
/// source order; the inline `top` is.
#[must_use]
pub fn from_view_lines(doc: &Document) -> Option<String> {
    let container = view_lines(doc)?;
    let mut lines = positioned_lines(&container);
    trace!(count = lines.len(), "positioned view lines");
    lines.sort_by_key(|(top, _)| *top);
    let joined = lines
        .into_iter()
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join("\n");
    has_content(&joined).then_some(joined)
}

/// Strategy 3: select everything in the editor input and read it back.
pub(crate) async fn from_select_all(
    surface: &dyn EditableSurface,
    delays: SelectAllDelays,
    usable: impl Fn(&str) -> bool,
) -> Option<String> {
    let _focus = FocusGuard::acquire(surface)?;
    sleep(delays.after_focus).await;

    if !surface.exec_select_all() {
        debug!("native select-all unavailable; relying on key chord");
    }
    sleep(delays.after_exec).await;

    surface.dispatch_select_all(SelectAllChord::for_platform());
    sleep(delays.after_chord).await;

    if let Some(value) = surface.control_value().filter(|v| usable(v)) {
        debug!(len = value.len(), "code read from editor input value");
        return Some(value);
    }
    if let Some(selected) = surface.selection_text().filter(|v| usable(v)) {
        debug!(len = selected.len(), "code read from active selection");
        surface.clear_selection();
        return Some(selected);
    }
    None
}

/// Line number shown by a gutter element, with the offset of the row it sits in.
fn gutter_entry(node: &dom_query::NodeRef) -> Option<(i64, usize)> {
    let sel = Selection::from(*node);
    let number = sel.text().trim().parse::<usize>().ok()?;
    let top = inline_top(&sel).or_else(|| {
        let parent = node.parent()?;
        inline_top(&Selection::from(parent))
    })?;
    Some((top, number))
}

/// Strategy 4: pair content lines with gutter line numbers by offset.
///
/// One line per offset (the last rendered wins). Lines the gutter numbers
/// are ordered by number, the rest by offset after them.
#[must_use]
pub fn from_gutter(doc: &Document) -> Option<String> {
    let editor = doc.select(EDITOR_SELECTOR);
    if editor.is_empty() {
        return None;
    }
    let editor = editor.first();
    let gutter: BTreeMap<i64, usize> = editor
        .select(GUTTER_SELECTOR)
        .nodes()
        .iter()
        .filter_map(gutter_entry)
        .collect();
    if gutter.is_empty() {
        return None;
    }
    let container = view_lines(doc)?;
    let by_top: BTreeMap<i64, String> = positioned_lines(&container).into_iter().collect();
    trace!(gutter = gutter.len(), lines = by_top.len(), "gutter cross-reference");

    let mut keyed: Vec<((usize, i64), String)> = by_top
        .into_iter()
        .map(|(top, text)| {
            let number = gutter.get(&top).copied().unwrap_or(usize::MAX);
            ((number, top), text)
        })
        .collect();
    keyed.sort_by_key(|(key, _)| *key);

    let joined = keyed
        .into_iter()
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join("\n");
    has_content(&joined).then_some(joined)
}

/// Whether the page renders an editor at all.
#[must_use]
pub fn has_editor(doc: &Document) -> bool {
    !doc.select(EDITOR_SELECTOR).is_empty()
}
