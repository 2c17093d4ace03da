use crate::core::{EditableSurface, FocusTarget};

/// Holds focus on the editor input and hands it back to whatever had it
/// before, on every exit path including cancellation.
pub(crate) struct FocusGuard<'a> {
    surface: &'a dyn EditableSurface,
    previous: Option<FocusTarget>,
}

impl<'a> FocusGuard<'a> {
    /// Focuses the editor input. `None` if the surface has no input to focus,
    /// in which case focus was never moved.
    pub(crate) fn acquire(surface: &'a dyn EditableSurface) -> Option<Self> {
        let previous = surface.active_element();
        if !surface.focus_editor_input() {
            return None;
        }
        Some(Self { surface, previous })
    }
}

impl Drop for FocusGuard<'_> {
    fn drop(&mut self) {
        if let Some(prev) = &self.previous {
            self.surface.focus(prev);
        }
    }
}
