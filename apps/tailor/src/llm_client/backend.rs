//! Client for a remote `/generate-resume` endpoint.
//!
//! Speaks the same JSON contract this service exposes, so one deployment can
//! render PDFs while another holds the provider credentials.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{CompletionError, TextCompletion};

pub const GENERATE_RESUME_PATH: &str = "/generate-resume";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResumeRequest {
    /// `None` for an absent or `null` field.
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub base_resume: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResumeResponse {
    pub tailored_resume: String,
}

/// Failure body shared by every endpoint: `{ error, details? }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: String) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            GENERATE_RESUME_PATH
        )
    }
}

#[async_trait]
impl TextCompletion for BackendClient {
    async fn complete(
        &self,
        job_description: &str,
        base_resume: &str,
    ) -> Result<String, CompletionError> {
        let request = GenerateResumeRequest {
            job_description: Some(job_description.to_string()),
            base_resume: Some(base_resume.to_string()),
        };

        let response = self.client.post(self.endpoint()).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let parsed = serde_json::from_str::<ErrorBody>(&body).ok();
            let message = parsed
                .as_ref()
                .map(|b| b.error.clone())
                .unwrap_or_else(|| format!("Backend Error {}", status.as_u16()));
            warn!(status = status.as_u16(), "Backend rejected request: {message}");

            return Err(match status {
                StatusCode::BAD_REQUEST => CompletionError::Validation(message),
                StatusCode::BAD_GATEWAY => CompletionError::Network(message),
                _ => CompletionError::Service {
                    message,
                    details: parsed.and_then(|b| b.details),
                },
            });
        }

        let data: GenerateResumeResponse = response.json().await?;
        if data.tailored_resume.is_empty() {
            return Err(CompletionError::Service {
                message: "Backend response empty.".to_string(),
                details: None,
            });
        }

        debug!(chars = data.tailored_resume.len(), "Backend returned tailored resume");
        Ok(data.tailored_resume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;

    async fn serve(app: Router) -> BackendClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        BackendClient::new(format!("http://{addr}/")).unwrap()
    }

    #[tokio::test]
    async fn test_success_returns_text_verbatim() {
        let app = Router::new().route(
            GENERATE_RESUME_PATH,
            post(|Json(req): Json<GenerateResumeRequest>| async move {
                Json(json!({
                    "tailoredResume": format!("# {}\n", req.base_resume.unwrap_or_default())
                }))
            }),
        );
        let client = serve(app).await;
        let text = client.complete("jd", "Jane Doe").await.unwrap();
        assert_eq!(text, "# Jane Doe\n");
    }

    #[tokio::test]
    async fn test_status_codes_map_to_error_kinds() {
        let app = Router::new().route(
            GENERATE_RESUME_PATH,
            post(|Json(req): Json<GenerateResumeRequest>| async move {
                let status = match req.job_description.as_deref() {
                    Some("400") => StatusCode::BAD_REQUEST,
                    Some("502") => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (
                    status,
                    Json(json!({ "error": "nope", "details": { "blockReason": "SAFETY" } })),
                )
            }),
        );
        let client = serve(app).await;

        assert!(matches!(
            client.complete("400", "r").await,
            Err(CompletionError::Validation(m)) if m == "nope"
        ));
        assert!(matches!(
            client.complete("502", "r").await,
            Err(CompletionError::Network(_))
        ));
        match client.complete("500", "r").await {
            Err(CompletionError::Service { message, details }) => {
                assert_eq!(message, "nope");
                assert_eq!(details.unwrap()["blockReason"], "SAFETY");
            }
            other => panic!("expected Service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_uses_status_message() {
        let app = Router::new().route(
            GENERATE_RESUME_PATH,
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let client = serve(app).await;
        let err = client.complete("jd", "r").await.unwrap_err();
        assert_eq!(err.user_message(), "Backend Error 503");
    }

    #[tokio::test]
    async fn test_empty_tailored_resume_is_service_error() {
        let app = Router::new().route(
            GENERATE_RESUME_PATH,
            post(|| async { Json(json!({ "tailoredResume": "" })) }),
        );
        let client = serve(app).await;
        let err = client.complete("jd", "r").await.unwrap_err();
        assert_eq!(err.user_message(), "Backend response empty.");
    }
}
