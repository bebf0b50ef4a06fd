//! Scoring client: the single point of entry for generative-language calls.
//!
//! Handlers talk to `ScoringService`, never to the HTTP API directly, so the
//! upstream can be swapped for a fake in tests.
//!
//! Each call makes exactly one request. There is no retry and no caching:
//! upstream failures are classified and handed back to the caller.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

/// The model used for every scoring call.
/// Hardcoded on purpose; a different model means a different prompt contract.
pub const MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    QuotaExceeded(String),

    #[error("{0}")]
    Response(String),
}

/// Prompt in, raw text out.
#[async_trait]
pub trait ScoringService: Send + Sync {
    async fn score(&self, prompt: &str) -> Result<String, ScoringError>;

    fn model(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
    status: Option<String>,
}

/// Wraps the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.scoring_timeout).build()?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_api_base.clone(),
            timeout_secs: config.scoring_timeout.as_secs(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, MODEL)
    }
}

#[async_trait]
impl ScoringService for GeminiClient {
    async fn score(&self, prompt: &str) -> Result<String, ScoringError> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model = MODEL, prompt_len = prompt.len(), "Sending scoring request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let err = classify_failure(status, &body);
            warn!("Scoring API returned {status}: {err}");
            return Err(err);
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ScoringError::Response(format!("malformed scoring response: {e}")))?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Scoring call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        reply_text(parsed)
    }

    fn model(&self) -> &str {
        MODEL
    }
}

impl GeminiClient {
    fn transport_error(&self, e: reqwest::Error) -> ScoringError {
        if e.is_timeout() {
            ScoringError::Unavailable(format!(
                "scoring service did not respond within {}s",
                self.timeout_secs
            ))
        } else {
            ScoringError::Unavailable(format!("could not reach scoring service: {e}"))
        }
    }
}

/// Classifies a non-success upstream reply, keeping the upstream message.
fn classify_failure(status: StatusCode, body: &str) -> ScoringError {
    let (message, upstream_status) = match serde_json::from_str::<GeminiError>(body) {
        Ok(e) => (e.error.message, e.error.status),
        Err(_) if body.trim().is_empty() => (status.to_string(), None),
        Err(_) => (body.trim().to_string(), None),
    };

    if status == StatusCode::TOO_MANY_REQUESTS
        || upstream_status.as_deref() == Some("RESOURCE_EXHAUSTED")
    {
        ScoringError::QuotaExceeded(message)
    } else if status.is_server_error() {
        ScoringError::Unavailable(message)
    } else {
        ScoringError::Response(message)
    }
}

/// Joins the text parts of the first candidate. The text itself is not touched.
fn reply_text(response: GenerateContentResponse) -> Result<String, ScoringError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(ScoringError::Response(format!(
            "prompt was blocked by the scoring service: {reason}"
        )));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ScoringError::Response("scoring service returned no candidates".into()))?;

    let texts: Vec<String> = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if texts.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".into());
        return Err(ScoringError::Response(format!(
            "scoring service returned no text (finish reason: {reason})"
        )));
    }

    Ok(texts.concat())
}
