//! Text completion clients: every call that produces tailored resume text.
//!
//! `TextCompletion` is the seam: `GeminiClient` talks to the AI provider
//! directly, `BackendClient` talks to another instance of this service over the
//! `/generate-resume` contract. Both return the provider text verbatim.
//!
//! Model: fixed in `MODEL`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error, warn};

pub mod backend;
pub mod prompts;

pub use backend::BackendClient;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all tailoring calls.
pub const MODEL: &str = "gemini-2.5-pro-exp-03-25";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_RETRIES: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Shown when the provider blocks the prompt or the candidate.
pub const SAFETY_MESSAGE: &str =
    "AI generation failed. Check Gemini safety settings or prompt issues.";
pub const NETWORK_MESSAGE: &str = "Network error communicating with AI service.";

#[derive(Debug, Error)]
pub enum CompletionError {
    /// Missing or empty input. Never retried.
    #[error("{0}")]
    Validation(String),

    /// The provider rejected or filtered the request. `message` is safe to show;
    /// `details` carries provider feedback when there is any.
    #[error("{message}")]
    Service {
        message: String,
        details: Option<Value>,
    },

    /// Transport failure or timeout. Callers may retry.
    #[error("Network error communicating with AI service: {0}")]
    Network(String),
}

impl CompletionError {
    /// One-line message for the end user. Never includes transport internals.
    pub fn user_message(&self) -> String {
        match self {
            CompletionError::Validation(msg) => msg.clone(),
            CompletionError::Service { message, .. } => message.clone(),
            CompletionError::Network(_) => NETWORK_MESSAGE.to_string(),
        }
    }

    fn service(message: impl Into<String>, details: Option<Value>) -> Self {
        CompletionError::Service {
            message: message.into(),
            details,
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CompletionError::service("AI service returned a malformed response.", None)
        } else {
            CompletionError::Network(e.to_string())
        }
    }
}

/// `(job description, base resume) → tailored Markdown`.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(
        &self,
        job_description: &str,
        base_resume: &str,
    ) -> Result<String, CompletionError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini wire types
// ────────────────────────────────────────────────────────────────────────────

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

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
pub struct ContentPart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Extracts the first candidate's text, or classifies why there is none.
    pub fn into_text(self) -> Result<String, CompletionError> {
        if let Some(feedback) = &self.prompt_feedback {
            if feedback.get("blockReason").is_some() {
                warn!(feedback = %feedback, "Gemini blocked the prompt");
                return Err(CompletionError::service(SAFETY_MESSAGE, self.prompt_feedback));
            }
        }

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(CompletionError::service(SAFETY_MESSAGE, self.prompt_feedback));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            let details = json!({
                "finishReason": candidate.finish_reason,
                "promptFeedback": self.prompt_feedback,
            });
            return Err(CompletionError::service(SAFETY_MESSAGE, Some(details)));
        }

        Ok(text)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// GeminiClient
// ────────────────────────────────────────────────────────────────────────────

/// Direct client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    retry_base_delay: Duration,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, reqwest::Error> {
        Self::with_base_url(api_key, GEMINI_API_BASE.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            base_url,
            retry_base_delay: RETRY_BASE_DELAY,
        })
    }

    #[cfg(test)]
    fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            MODEL
        )
    }

    /// Sends one prompt. Rate limiting (429) and provider overload (503) are
    /// retried with exponential backoff; everything else fails immediately.
    pub async fn generate(&self, prompt: &str) -> Result<String, CompletionError> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let mut last_status = StatusCode::TOO_MANY_REQUESTS;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = self.retry_base_delay * (1 << (attempt - 1));
                warn!(
                    "Gemini call attempt {} got {}, retrying after {}ms...",
                    attempt,
                    last_status,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(self.endpoint())
                .header("x-goog-api-key", &self.api_key)
                .json(&request_body)
                .send()
                .await?;

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE
            {
                last_status = status;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                error!(status = status.as_u16(), "Gemini API error: {message}");
                return Err(CompletionError::service(
                    "AI generation failed.",
                    Some(json!({ "status": status.as_u16() })),
                ));
            }

            let parsed: GenerateContentResponse = response.json().await?;
            let text = parsed.into_text()?;
            debug!(chars = text.len(), "Gemini call succeeded");
            return Ok(text);
        }

        Err(CompletionError::service(
            "AI service is busy. Try again shortly.",
            Some(json!({ "status": last_status.as_u16(), "retries": MAX_RETRIES })),
        ))
    }
}

#[async_trait]
impl TextCompletion for GeminiClient {
    async fn complete(
        &self,
        job_description: &str,
        base_resume: &str,
    ) -> Result<String, CompletionError> {
        let prompt = prompts::build_tailor_prompt(job_description, base_resume);
        self.generate(&prompt).await
    }
}
