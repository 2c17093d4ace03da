/* --------- Minimal serde mapping for the snapshot payload --------- */

use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
pub(crate) struct ProblemNode {
    #[serde(default)]
    pub(crate) difficulty: Option<Value>,
    #[serde(rename = "topicTags", default)]
    pub(crate) topic_tags: Option<Value>,
}

#[derive(Deserialize)]
pub(crate) struct TopicTagNode {
    pub(crate) name: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct SubmissionNode {
    #[serde(default)]
    pub(crate) code: Option<Value>,
    #[serde(rename = "submissionCode", default)]
    pub(crate) submission_code: Option<Value>,
    #[serde(default)]
    pub(crate) lang: Option<Value>,
    #[serde(default)]
    pub(crate) language: Option<Value>,
    #[serde(rename = "langSlug", default)]
    pub(crate) lang_slug: Option<Value>,
}

/// `lang` is either a bare slug or an object such as `{"name":"python3","verboseName":"Python3"}`.
pub(crate) fn lang_label(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(map) => map
            .get("verboseName")
            .or_else(|| map.get("name"))
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().to_string()),
        _ => None,
    }
}
