use super::{PageView, Strategy, first_hit};
use crate::core::Status;

/// `Accepted` is checked before the failure verdicts.
fn from_page_text(view: &PageView<'_>) -> Option<Status> {
    let text = view.text();
    Status::KNOWN
        .into_iter()
        .find(|status| text.contains(status.label()))
}

const STRATEGIES: [Strategy<Status>; 1] = [("page text", from_page_text)];

/// Submission verdict by literal label search over the page text.
#[must_use]
pub fn extract_status(view: &PageView<'_>) -> Status {
    first_hit("status", view, &STRATEGIES).unwrap_or(Status::Unknown)
}
