//! Standalone content endpoints — single-article generation and a humanizer
//! pass-through, outside any bulk job.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clients::generator::{
    article_prompt, title_from_topic, DEFAULT_MIN_WORDS, DEFAULT_TONE,
};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub topic: String,
    pub tone: Option<String>,
    pub min_words: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub content: String,
    pub title: String,
    pub word_count: u32,
    pub topic: String,
}

/// POST /api/v1/content/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let topic = req.topic.trim();
    if topic.is_empty() {
        return Err(AppError::Validation("Topic is required".to_string()));
    }

    let tone = req.tone.as_deref().unwrap_or(DEFAULT_TONE);
    let min_words = req.min_words.unwrap_or(DEFAULT_MIN_WORDS);

    let prompt = article_prompt(topic, tone, min_words);
    let article = state
        .generator
        .complete(&prompt)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Content generation failed: {e}")))?;

    info!("Generated {} words for topic '{topic}'", article.word_count);

    Ok(Json(GenerateResponse {
        title: title_from_topic(topic),
        word_count: article.word_count,
        content: article.content,
        topic: topic.to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct HumanizeRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct HumanizeResponse {
    pub content: String,
}

/// POST /api/v1/content/humanize
pub async fn handle_humanize(
    State(state): State<AppState>,
    Json(req): Json<HumanizeRequest>,
) -> Result<Json<HumanizeResponse>, AppError> {
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }

    let content = state
        .humanizer
        .humanize(&req.content)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Humanization failed: {e}")))?;

    Ok(Json(HumanizeResponse { content }))
}
