//! Axum route handlers for resume tailoring.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::backend::{GenerateResumeRequest, GenerateResumeResponse};
use crate::state::AppState;
use crate::tailoring::pipeline::{PdfOutcome, PdfRequest, Pipeline, MISSING_INPUT_MESSAGE};

/// POST /generate-resume
///
/// `{ jobDescription, baseResume }` → `{ tailoredResume }`, text returned verbatim.
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    payload: Result<Json<GenerateResumeRequest>, JsonRejection>,
) -> Result<Json<GenerateResumeResponse>, AppError> {
    info!("Received request on /generate-resume");
    let Json(request) = payload?;

    let (Some(job_description), Some(base_resume)) = (
        request.job_description.filter(|s| !s.is_empty()),
        request.base_resume.filter(|s| !s.is_empty()),
    ) else {
        tracing::warn!("Request missing jobDescription or baseResume.");
        return Err(AppError::Validation(MISSING_INPUT_MESSAGE.to_string()));
    };

    let tailored_resume = state.llm.complete(&job_description, &base_resume).await?;
    info!(chars = tailored_resume.len(), "Received response from AI service");

    Ok(Json(GenerateResumeResponse { tailored_resume }))
}

/// POST /generate-pdf
///
/// Full pipeline: scrape (optional) → tailor → layout → deliver.
/// Replies once, with the saved filename and a `data:` URL of the PDF.
pub async fn handle_generate_pdf(
    State(state): State<AppState>,
    payload: Result<Json<PdfRequest>, JsonRejection>,
) -> Result<Json<PdfOutcome>, AppError> {
    info!("Received request on /generate-pdf");
    let Json(request) = payload?;

    let pipeline = Pipeline {
        completion: state.resume_source.as_ref(),
        settings: state.settings.clone(),
        save_target: state.save_target.clone(),
        page_metrics: &state.page_metrics,
    };
    let outcome = pipeline.run(request).await?;

    Ok(Json(outcome))
}
