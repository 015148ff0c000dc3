use std::sync::Arc;

use crate::delivery::SaveTarget;
use crate::layout::PageMetrics;
use crate::llm_client::TextCompletion;
use crate::settings::SettingsStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Direct AI provider client. Serves `/generate-resume`.
    pub llm: Arc<dyn TextCompletion>,
    /// Source of tailored text for `/generate-pdf`: the provider client, or a
    /// remote backend when `TAILOR_BACKEND_URL` is set.
    pub resume_source: Arc<dyn TextCompletion>,
    pub settings: Arc<dyn SettingsStore>,
    pub save_target: Arc<dyn SaveTarget>,
    /// Page and tier constants for the layout engine (A4, 50pt margins).
    pub page_metrics: PageMetrics,
}
