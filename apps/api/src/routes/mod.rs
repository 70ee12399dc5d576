pub mod health;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::bulk::handlers;
use crate::content;
use crate::sites::SiteSummary;
use crate::state::AppState;

async fn handle_list_sites(State(state): State<AppState>) -> Json<Vec<SiteSummary>> {
    Json(state.sites.summaries())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Publish targets
        .route("/api/v1/sites", get(handle_list_sites))
        // Standalone content tools
        .route("/api/v1/content/generate", post(content::handle_generate))
        .route("/api/v1/content/humanize", post(content::handle_humanize))
        // Bulk import pipeline
        .route("/api/v1/bulk-import", post(handlers::handle_trigger))
        .route(
            "/api/v1/bulk-import/:job_id",
            get(handlers::handle_poll).delete(handlers::handle_delete),
        )
        .route(
            "/api/v1/bulk-import/:job_id/report",
            get(handlers::handle_report),
        )
        .with_state(state)
}
