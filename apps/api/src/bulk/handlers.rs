//! Axum route handlers for the bulk import API.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::bulk::models::BulkImportJob;
use crate::bulk::report::{render_csv, report_filename};
use crate::bulk::spreadsheet::parse_rows;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    pub job_id: Uuid,
    pub total_posts: u32,
}

/// POST /api/v1/bulk-import
///
/// Multipart: `file` (CSV spreadsheet) + `site_id` (configured publish
/// target). Creates the job, starts it on a background task, and returns the
/// id without waiting for any row to process.
pub async fn handle_trigger(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TriggerResponse>, AppError> {
    let mut file: Option<Vec<u8>> = None;
    let mut site_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Upload(format!("Failed to read upload: {e}")))?;
                file = Some(data.to_vec());
            }
            Some("site_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Upload(format!("Failed to read site_id: {e}")))?;
                site_id = Some(value.trim().to_string());
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    let site_id =
        site_id.ok_or_else(|| AppError::Validation("Missing 'site_id' field".to_string()))?;

    let site = state
        .sites
        .get(&site_id)
        .ok_or_else(|| AppError::Validation(format!("Unknown target site '{site_id}'")))?
        .clone();

    let rows = parse_rows(&file)?;
    let titles: Vec<String> = rows.into_iter().map(|r| r.title).collect();

    let job = BulkImportJob::new(site_id, titles);
    let response = TriggerResponse {
        job_id: job.id,
        total_posts: job.total_posts,
    };
    state.store.insert(job);
    state.runner.spawn(site, response.job_id);

    info!(
        "Bulk import {} created with {} posts",
        response.job_id, response.total_posts
    );
    Ok(Json(response))
}

/// GET /api/v1/bulk-import/:job_id
pub async fn handle_poll(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<BulkImportJob>, AppError> {
    let job = state
        .store
        .get(job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    Ok(Json(job))
}

/// DELETE /api/v1/bulk-import/:job_id
///
/// Removes the record only. An in-flight runner is not cancelled; its
/// remaining writes land on a missing id and are discarded.
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.store.delete(job_id) {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    info!("Bulk import {job_id} deleted");
    Ok(Json(json!({ "deleted": true })))
}

/// GET /api/v1/bulk-import/:job_id/report
pub async fn handle_report(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let job = state
        .store
        .get(job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let csv = render_csv(&job).map_err(AppError::Internal)?;
    let disposition = format!("attachment; filename=\"{}\"", report_filename(&job));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::bulk::runner::JobRunner;
    use crate::bulk::store::JobStore;
    use crate::clients::generator::OpenRouterGenerator;
    use crate::clients::humanizer::ScriptHumanizer;
    use crate::clients::images::UnsplashSourceProvider;
    use crate::clients::wordpress::WordPressClient;
    use crate::config::Config;
    use crate::notify::NoopNotifier;
    use crate::sites::{PublishSite, SiteRegistry};

    fn test_config() -> Config {
        Config {
            openrouter_api_key: "test-key".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            sites_file: "sites.json".to_string(),
            humanizer_script: "humanizer.py".to_string(),
            images_per_post: 4,
            notify_webhook_url: None,
            generation_timeout_secs: 120,
            humanize_timeout_secs: 60,
            publish_timeout_secs: 30,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }

    /// State with real (but never-called) clients; only store/sites matter here.
    fn test_state() -> AppState {
        let config = test_config();
        let store = JobStore::new();
        let generator = Arc::new(OpenRouterGenerator::new(
            config.openrouter_api_key.clone(),
            config.frontend_url.clone(),
            config.generation_timeout_secs,
        ));
        let humanizer = Arc::new(ScriptHumanizer::new(
            config.humanizer_script.clone(),
            config.humanize_timeout_secs,
        ));
        let runner = Arc::new(JobRunner::new(
            store.clone(),
            generator.clone(),
            humanizer.clone(),
            Arc::new(UnsplashSourceProvider::new()),
            Arc::new(WordPressClient::new(config.publish_timeout_secs)),
            Arc::new(NoopNotifier),
            config.images_per_post,
        ));
        let sites = Arc::new(SiteRegistry::from_sites(vec![PublishSite {
            id: "site-1".to_string(),
            name: "Test".to_string(),
            base_url: "https://blog.example.com".to_string(),
            username: "admin".to_string(),
            app_password: "pw".to_string(),
        }]));
        AppState {
            store,
            sites,
            runner,
            generator,
            humanizer,
            config,
        }
    }

    #[tokio::test]
    async fn test_poll_unknown_job_is_not_found() {
        let state = test_state();
        let result = handle_poll(State(state), Path(Uuid::new_v4())).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_poll_returns_snapshot_with_posts() {
        let state = test_state();
        let id = state.store.insert(BulkImportJob::new(
            "site-1".to_string(),
            vec!["A".to_string(), "B".to_string()],
        ));
        let Json(job) = handle_poll(State(state), Path(id)).await.unwrap();
        assert_eq!(job.id, id);
        assert_eq!(job.total_posts, 2);
        assert_eq!(job.posts.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_then_poll_is_not_found() {
        let state = test_state();
        let id = state
            .store
            .insert(BulkImportJob::new("site-1".to_string(), vec!["A".to_string()]));

        handle_delete(State(state.clone()), Path(id)).await.unwrap();
        let result = handle_poll(State(state.clone()), Path(id)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let result = handle_delete(State(state), Path(id)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_report_unknown_job_is_not_found() {
        let state = test_state();
        let result = handle_report(State(state), Path(Uuid::new_v4())).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
