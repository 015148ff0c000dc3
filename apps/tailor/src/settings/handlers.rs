//! Axum route handlers for the stored base resume.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::settings::{is_valid_resume, load_base_resume, with_store, BASE_RESUME_KEY};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseResumeBody {
    pub base_resume: Option<String>,
}

/// GET /settings/base-resume
pub async fn handle_get_base_resume(
    State(state): State<AppState>,
) -> Result<Json<BaseResumeBody>, AppError> {
    let base_resume = with_store(state.settings.clone(), load_base_resume).await?;
    Ok(Json(BaseResumeBody { base_resume }))
}

/// PUT /settings/base-resume
///
/// Rejects anything shorter than a plausible resume.
pub async fn handle_put_base_resume(
    State(state): State<AppState>,
    payload: Result<Json<BaseResumeBody>, JsonRejection>,
) -> Result<Json<BaseResumeBody>, AppError> {
    let Json(request) = payload?;
    let resume = request.base_resume.unwrap_or_default();
    if !is_valid_resume(&resume) {
        return Err(AppError::Validation(
            "Please paste a valid resume.".to_string(),
        ));
    }

    let stored = resume.clone();
    with_store(state.settings.clone(), move |store| store.set(BASE_RESUME_KEY, &stored)).await?;
    info!(chars = resume.len(), "Base resume saved");

    Ok(Json(BaseResumeBody {
        base_resume: Some(resume),
    }))
}
