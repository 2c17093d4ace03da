//! Recovery of the submitted source from a virtualized code editor.
//!
//! The editor renders only the lines in view, so the DOM alone may be
//! missing or reordering lines. Strategies, in order:
//! 1. the editor's programmatic model,
//! 2. rendered lines sorted by vertical offset,
//! 3. select-all emulation on the editor input,
//! 4. gutter line numbers cross-referenced with rendered lines.
//!
//! A result counts only if it is longer than the configured minimum. When
//! everything misses, a sentinel message pointing at the page URL is
//! returned instead; recovery never fails.

mod focus;
mod strategies;

pub use strategies::{from_gutter, from_view_lines, has_editor};

use tracing::{debug, info, instrument};
use url::Url;

use crate::core::{ExtractorConfig, Page};
use strategies::{from_editor_api, from_select_all};

/// Prefix of the text returned when no strategy recovered the code.
pub const CODE_FAILURE_PREFIX: &str = "Code extraction failed";

/// The placeholder stored in `code` when recovery fails.
#[must_use]
pub fn failure_sentinel(url: &Url) -> String {
    format!(
        "{CODE_FAILURE_PREFIX} - Monaco editor may be using virtualization. Open {url} to copy the code manually."
    )
}

/// Whether `code` is the recovery-failure placeholder rather than real source.
#[must_use]
pub fn is_failure_sentinel(code: &str) -> bool {
    code.starts_with(CODE_FAILURE_PREFIX)
}

/// Strategies 1 and 2 only: no focus changes, no waiting.
pub fn quick_recover<P: Page + ?Sized>(page: &P, config: &ExtractorConfig) -> Option<String> {
    if let Some(code) = from_editor_api(page).filter(|c| config.usable_code(c)) {
        debug!(len = code.len(), "code from editor API");
        return Some(code);
    }
    let doc = page.document();
    from_view_lines(&doc).filter(|c| config.usable_code(c))
}

/// Runs the full strategy chain against `page`.
#[instrument(level = "debug", skip_all)]
pub async fn recover_code<P: Page + ?Sized>(page: &P, config: &ExtractorConfig) -> String {
    if let Some(code) = from_editor_api(page).filter(|c| config.usable_code(c)) {
        debug!(len = code.len(), "code from editor API");
        return code;
    }

    let (editor_present, by_position) = {
        let doc = page.document();
        (has_editor(&doc), from_view_lines(&doc))
    };
    if !editor_present {
        info!("no code editor on page");
        return failure_sentinel(&page.url());
    }
    if let Some(code) = by_position.filter(|c| config.usable_code(c)) {
        debug!(len = code.len(), "code from positioned view lines");
        return code;
    }

    if let Some(surface) = page.surface()
        && let Some(code) =
            from_select_all(surface, config.select_all, |c| config.usable_code(c)).await
    {
        return code;
    }

    let by_gutter = {
        let doc = page.document();
        from_gutter(&doc)
    };
    if let Some(code) = by_gutter.filter(|c| config.usable_code(c)) {
        debug!(len = code.len(), "code from gutter cross-reference");
        return code;
    }

    info!("all code recovery strategies failed");
    failure_sentinel(&page.url())
}
