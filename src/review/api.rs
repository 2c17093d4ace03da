use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use super::model::Critique;
use super::prompt::{SYSTEM_INSTRUCTIONS, build_prompt};
use crate::core::{ExtractError, ExtractedRecord};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A service that reviews a submission.
pub trait Analyzer: Send + Sync {
    /// Reviews `record`. `description` overrides the record's own statement.
    fn analyze(
        &self,
        record: &ExtractedRecord,
        description: Option<&str>,
    ) -> impl Future<Output = Result<Critique, ExtractError>> + Send;
}

/* ----------------------- wire ----------------------- */

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    system_instruction: Content<'a>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 8192,
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.trim().is_empty())
    }
}

/// The outermost `{...}` span of `text`: models wrap their JSON in prose or
/// code fences.
fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/* ----------------------- client ----------------------- */

/// [`Analyzer`] backed by the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiAnalyzer {
    http: Client,
    base_url: Url,
    model: String,
    api_key: Option<String>,
}

impl GeminiAnalyzer {
    /// Create a new builder.
    pub fn builder() -> GeminiAnalyzerBuilder {
        GeminiAnalyzerBuilder::default()
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> Result<Url, ExtractError> {
        Ok(self
            .base_url
            .join(&format!("models/{}:generateContent", self.model))?)
    }

    #[instrument(level = "debug", skip_all, fields(model = %self.model, problem = %record.problem_name))]
    async fn generate(
        &self,
        record: &ExtractedRecord,
        description: Option<&str>,
    ) -> Result<Critique, ExtractError> {
        let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) else {
            return Err(ExtractError::Analysis(
                "analyzer is not configured: missing API key".into(),
            ));
        };

        let endpoint = self.endpoint()?;
        let prompt = build_prompt(record, description);
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: &prompt }],
            }],
            system_instruction: Content {
                parts: [Part {
                    text: SYSTEM_INSTRUCTIONS,
                }],
            },
            generation_config: GenerationConfig::default(),
        };

        let resp = self
            .http
            .post(endpoint.clone())
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .ok()
                .and_then(|e| e.error)
                .and_then(|e| e.message);
            warn!(status = status.as_u16(), "analysis request rejected");
            return Err(match message {
                Some(msg) => ExtractError::Analysis(format!("API error ({status}): {msg}")),
                None => ExtractError::Status {
                    status: status.as_u16(),
                    url: endpoint.to_string(),
                },
            });
        }

        let answer = serde_json::from_str::<GenerateResponse>(&text)?
            .first_text()
            .ok_or_else(|| ExtractError::Analysis("no response text from the model".into()))?;
        debug!(len = answer.len(), "model answered");

        let span = json_span(&answer)
            .ok_or_else(|| ExtractError::Analysis("model answer contains no JSON object".into()))?;
        serde_json::from_str(span)
            .map_err(|e| ExtractError::Analysis(format!("model answer is not a valid critique: {e}")))
    }
}

impl Analyzer for GeminiAnalyzer {
    fn analyze(
        &self,
        record: &ExtractedRecord,
        description: Option<&str>,
    ) -> impl Future<Output = Result<Critique, ExtractError>> + Send {
        self.generate(record, description)
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct GeminiAnalyzerBuilder {
    api_key: Option<String>,
    base_url: Option<Url>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl GeminiAnalyzerBuilder {
    /// Set the API key. Without one every call fails before reaching the network.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the API base (e.g., `https://generativelanguage.googleapis.com/v1beta/`).
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Override the model name. Default: `gemini-2.5-flash`.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the overall request timeout. Default: 60s.
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Build the analyzer.
    ///
    /// # Errors
    /// Fails if the default base URL cannot be parsed or the HTTP client
    /// cannot be constructed.
    pub fn build(self) -> Result<GeminiAnalyzer, ExtractError> {
        let base_url = match self.base_url {
            Some(u) => u,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };
        let http = Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;
        Ok(GeminiAnalyzer {
            http,
            base_url,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: self.api_key,
        })
    }
}
