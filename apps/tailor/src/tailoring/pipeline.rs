//! Tailor-and-deliver pipeline: job posting + base resume → saved PDF.
//!
//! Order: validate the page, resolve the base resume (request, then settings),
//! resolve the job context (scraped page or raw text), call the completion
//! source, then lay out and deliver on the blocking pool. Every failure returns
//! early; exactly one result per request.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::delivery::{deliver, FilenameDescriptor, SaveTarget};
use crate::errors::AppError;
use crate::layout::{render_markdown, PageMetrics};
use crate::llm_client::TextCompletion;
use crate::scrape::{is_job_posting_url, scrape_job_page};
use crate::settings::{load_base_resume, with_store, SettingsStore};

pub const MISSING_INPUT_MESSAGE: &str = "Missing job description or base resume in request.";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfRequest {
    /// Raw job description. Ignored when `job_page_html` is present.
    pub job_description: Option<String>,
    /// Captured job posting page to scrape.
    pub job_page_html: Option<String>,
    /// URL the page was captured from, if known.
    pub page_url: Option<String>,
    /// Overrides the stored base resume for this request.
    pub base_resume: Option<String>,
    pub filename_data: Option<FilenameDescriptor>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfOutcome {
    pub success: bool,
    pub filename: String,
    pub data_url: String,
    pub location: String,
    pub pages: usize,
    /// Non-fatal problems such as missing scraped fields.
    pub warnings: Vec<String>,
}

/// Collaborators the pipeline runs against.
pub struct Pipeline<'a> {
    pub completion: &'a dyn TextCompletion,
    pub settings: Arc<dyn SettingsStore>,
    pub save_target: Arc<dyn SaveTarget>,
    pub page_metrics: &'a PageMetrics,
}

impl Pipeline<'_> {
    pub async fn run(&self, request: PdfRequest) -> Result<PdfOutcome, AppError> {
        if let Some(url) = request.page_url.as_deref() {
            if !is_job_posting_url(url) {
                return Err(AppError::Validation(
                    "Run on a job posting page.".to_string(),
                ));
            }
        }

        let base_resume = match request.base_resume.filter(|r| !r.trim().is_empty()) {
            Some(resume) => resume,
            None => with_store(self.settings.clone(), load_base_resume)
                .await?
                .ok_or_else(|| AppError::Validation("Base resume not set.".to_string()))?,
        };

        let mut warnings = Vec::new();
        let (job_description, scraped_names) = match request.job_page_html.as_deref() {
            Some(html) => {
                let job = scrape_job_page(html);
                if !job.description_found() {
                    warn!("Scraper: continuing without a job description");
                }
                warnings.extend(job.warnings.iter().cloned());
                let names = FilenameDescriptor {
                    company_name: Some(job.company_name.clone()),
                    job_title: Some(job.job_title.clone()),
                };
                (job.full_job_context, Some(names))
            }
            None => (request.job_description.unwrap_or_default(), None),
        };

        if job_description.trim().is_empty() {
            return Err(AppError::Validation(MISSING_INPUT_MESSAGE.to_string()));
        }

        let descriptor = request
            .filename_data
            .or(scraped_names)
            .unwrap_or_default();

        info!(
            jd_chars = job_description.len(),
            resume_chars = base_resume.len(),
            "Requesting tailored resume"
        );
        let markdown = self
            .completion
            .complete(&job_description, &base_resume)
            .await?;

        let metrics = self.page_metrics.clone();
        let target = Arc::clone(&self.save_target);
        let (pages, delivered) = tokio::task::spawn_blocking(move || {
            let document = render_markdown(&markdown, &metrics);
            deliver(&document, &descriptor, target.as_ref())
                .map(|delivered| (document.page_count(), delivered))
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??;

        info!(pages, filename = %delivered.filename, "Tailored PDF ready");

        Ok(PdfOutcome {
            success: true,
            filename: delivered.filename,
            data_url: delivered.data_url,
            location: delivered.location,
            pages,
            warnings,
        })
    }
}
