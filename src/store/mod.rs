//! Persistence of saved submissions.
//!
//! Storage itself is a capability ([`KeyValueStore`]); [`SubmissionStore`]
//! keeps the saved list under one key, newest first, capped at
//! [`MAX_SUBMISSIONS`] entries.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::core::{ExtractError, ExtractedRecord};

/// Key the submission list is stored under.
pub const SUBMISSIONS_KEY: &str = "submissions";
/// Oldest entries beyond this count are dropped on save.
pub const MAX_SUBMISSIONS: usize = 100;

/// Async last-write-wins key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str)
    -> impl Future<Output = Result<Option<Value>, ExtractError>> + Send;

    fn set(&self, key: &str, value: Value) -> impl Future<Output = Result<(), ExtractError>> + Send;
}

/// In-process [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, ExtractError> {
        let guard = self.map.read().await;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), ExtractError> {
        let mut guard = self.map.write().await;
        guard.insert(key.to_string(), value);
        Ok(())
    }
}

/// A record as persisted: the extraction plus its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSubmission {
    /// Epoch milliseconds at save time, as a string.
    pub id: String,
    #[serde(flatten)]
    pub record: ExtractedRecord,
}

/// The saved-submission list on top of a [`KeyValueStore`].
#[derive(Debug)]
pub struct SubmissionStore<S> {
    inner: S,
    // Serializes read-modify-write of the list.
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> SubmissionStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            write_lock: Mutex::new(()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Saves `record` with `notes` at the head of the list.
    ///
    /// Ids are epoch milliseconds; a save within the same millisecond as the
    /// newest entry takes the next integer so ids stay unique.
    ///
    /// # Errors
    /// Propagates store failures, and fails if the stored list is malformed.
    pub async fn save(
        &self,
        mut record: ExtractedRecord,
        notes: impl Into<String>,
    ) -> Result<SavedSubmission, ExtractError> {
        let _guard = self.write_lock.lock().await;
        let mut saved = self.list().await?;

        let mut id = Utc::now().timestamp_millis();
        if let Some(newest) = saved.first().and_then(|s| s.id.parse::<i64>().ok())
            && newest >= id
        {
            id = newest + 1;
        }
        record.notes = notes.into();
        let entry = SavedSubmission {
            id: id.to_string(),
            record,
        };

        saved.insert(0, entry.clone());
        if saved.len() > MAX_SUBMISSIONS {
            debug!(dropped = saved.len() - MAX_SUBMISSIONS, "trimming saved submissions");
            saved.truncate(MAX_SUBMISSIONS);
        }
        self.inner
            .set(SUBMISSIONS_KEY, serde_json::to_value(&saved)?)
            .await?;
        info!(id = %entry.id, problem = %entry.record.problem_name, "submission saved");
        Ok(entry)
    }

    /// All saved submissions, newest first. An unset key is an empty list.
    ///
    /// # Errors
    /// Propagates store failures, and fails if the stored value is not a list
    /// of submissions.
    pub async fn list(&self) -> Result<Vec<SavedSubmission>, ExtractError> {
        match self.inner.get(SUBMISSIONS_KEY).await? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value @ Value::Array(_)) => Ok(serde_json::from_value(value)?),
            Some(other) => Err(ExtractError::Store(format!(
                "`{SUBMISSIONS_KEY}` holds {}, expected a list",
                kind_of(&other)
            ))),
        }
    }

    /// The saved submission with `id`, if any.
    ///
    /// # Errors
    /// Same as [`list`](Self::list).
    pub async fn get(&self, id: &str) -> Result<Option<SavedSubmission>, ExtractError> {
        Ok(self.list().await?.into_iter().find(|s| s.id == id))
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
