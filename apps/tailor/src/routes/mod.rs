pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::settings::handlers as settings;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/generate-resume", post(tailoring::handle_generate_resume))
        .route("/generate-pdf", post(tailoring::handle_generate_pdf))
        .route(
            "/settings/base-resume",
            get(settings::handle_get_base_resume).put(settings::handle_put_base_resume),
        )
        .with_state(state)
}
