//! The live page as seen by the extractor.
//!
//! A [`Page`] hands out the current DOM as HTML (parsed on demand into a
//! [`dom_query::Document`]), the page location, and optionally the host
//! editor's programmatic API and an editable surface for select-all
//! emulation. Everything beyond `url` and `html` has a default so a plain
//! HTML snapshot is already a usable page.

use std::sync::Arc;

use dom_query::Document;
use tokio::sync::watch;
use url::Url;

use crate::core::ExtractError;
use crate::stability::NavigationSource;

/// One instance reported by the host editor's API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorInstance {
    /// Whether the instance's DOM node is still attached to the document.
    pub attached: bool,
    /// The instance's model text, if it has a model.
    pub value: Option<String>,
}

/// Opaque handle to a focusable element, as understood by the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FocusTarget(pub String);

/// Modifier used for the select-all key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllChord {
    Ctrl,
    Meta,
}

impl SelectAllChord {
    /// The chord the current platform's editors listen for.
    #[must_use]
    pub const fn for_platform() -> Self {
        if cfg!(target_os = "macos") {
            Self::Meta
        } else {
            Self::Ctrl
        }
    }
}

/// Focus and selection control over the editor's hidden input element.
///
/// Only used by select-all emulation; every method is best-effort.
pub trait EditableSurface: Send + Sync {
    /// The element that currently has focus.
    fn active_element(&self) -> Option<FocusTarget>;
    /// Move focus back to a previously captured element.
    fn focus(&self, target: &FocusTarget);
    /// Focus the editor's input control. Returns `false` if there is none.
    fn focus_editor_input(&self) -> bool;
    /// Run the document's native select-all command. Returns `false` if unsupported.
    fn exec_select_all(&self) -> bool;
    /// Dispatch a synthetic select-all key chord at the focused control.
    fn dispatch_select_all(&self, chord: SelectAllChord);
    /// Current value of the focused control.
    fn control_value(&self) -> Option<String>;
    /// Text of the active selection.
    fn selection_text(&self) -> Option<String>;
    fn clear_selection(&self);
}

/// Read access to the page being extracted.
pub trait Page: Send + Sync {
    /// Current location, including query string.
    fn url(&self) -> Url;

    /// Serialized DOM as it is right now.
    fn html(&self) -> String;

    /// Parses the current DOM. Cheap enough to call per extraction step;
    /// callers must not keep the document across a suspension point.
    fn document(&self) -> Document {
        Document::from(self.html().as_str())
    }

    /// Editor instances exposed by the host editor API, in API order.
    fn editor_instances(&self) -> Vec<EditorInstance> {
        Vec::new()
    }

    /// Models known to the editor API that are not bound to an instance.
    fn editor_models(&self) -> Vec<String> {
        Vec::new()
    }

    /// Focus/selection control, when the platform provides it.
    fn surface(&self) -> Option<&dyn EditableSurface> {
        None
    }

    /// Counter bumped on every DOM mutation, when the platform can observe them.
    fn mutations(&self) -> Option<watch::Receiver<u64>> {
        None
    }

    /// Route changes of this page context, when the platform reports them.
    fn navigation(&self) -> Option<Arc<dyn NavigationSource>> {
        None
    }
}

/// A frozen page: fixed HTML at a fixed URL, no editor API.
#[derive(Debug, Clone)]
pub struct StaticPage {
    url: Url,
    html: String,
}

impl StaticPage {
    /// # Errors
    ///
    /// Returns [`ExtractError::Url`] if `url` does not parse.
    pub fn new(url: &str, html: impl Into<String>) -> Result<Self, ExtractError> {
        Ok(Self {
            url: Url::parse(url)?,
            html: html.into(),
        })
    }
}

impl Page for StaticPage {
    fn url(&self) -> Url {
        self.url.clone()
    }

    fn html(&self) -> String {
        self.html.clone()
    }
}
