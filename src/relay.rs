//! Request/response messages exchanged with the extension's other contexts.
//!
//! Requests are tagged by `action`:
//!
//! ```json
//! {"action": "extractData"}
//! {"action": "saveSubmission", "data": { ...record... }}
//! {"action": "getSubmissions"}
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{ExtractedRecord, Page};
use crate::extractor::Extractor;
use crate::store::{KeyValueStore, SavedSubmission, SubmissionStore};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    ExtractData,
    /// Persist a record; its `notes` field is saved with it.
    SaveSubmission { data: ExtractedRecord },
    GetSubmissions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// Extraction finished; `data` is `null` when nothing could be assembled.
    Extracted {
        success: bool,
        data: Option<ExtractedRecord>,
    },
    Saved { success: bool, id: String },
    Submissions { submissions: Vec<SavedSubmission> },
    Failed { success: bool, error: String },
}

impl Response {
    fn failed(error: impl ToString) -> Self {
        Self::Failed {
            success: false,
            error: error.to_string(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Self::Extracted { success, .. }
            | Self::Saved { success, .. }
            | Self::Failed { success, .. } => *success,
            Self::Submissions { .. } => true,
        }
    }
}

/// Dispatches one request.
pub async fn handle<P, S>(
    request: Request,
    extractor: &Extractor<P>,
    store: &SubmissionStore<S>,
) -> Response
where
    P: Page + ?Sized,
    S: KeyValueStore,
{
    match request {
        Request::ExtractData => Response::Extracted {
            success: true,
            data: extractor.extract_all().await,
        },
        Request::SaveSubmission { data } => {
            let notes = data.notes.clone();
            match store.save(data, notes).await {
                Ok(saved) => Response::Saved {
                    success: true,
                    id: saved.id,
                },
                Err(e) => {
                    warn!(error = %e, "saveSubmission failed");
                    Response::failed(e)
                }
            }
        }
        Request::GetSubmissions => match store.list().await {
            Ok(submissions) => Response::Submissions { submissions },
            Err(e) => {
                warn!(error = %e, "getSubmissions failed");
                Response::failed(e)
            }
        },
    }
}

/// Parses `raw` as a [`Request`] and dispatches it. A malformed message is
/// answered with a failure response.
pub async fn handle_message<P, S>(
    raw: &str,
    extractor: &Extractor<P>,
    store: &SubmissionStore<S>,
) -> Response
where
    P: Page + ?Sized,
    S: KeyValueStore,
{
    match serde_json::from_str::<Request>(raw) {
        Ok(request) => {
            debug!(?request, "relay request");
            handle(request, extractor, store).await
        }
        Err(e) => {
            warn!(error = %e, "unreadable relay message");
            Response::failed(format!("invalid request: {e}"))
        }
    }
}
