//! External collaborator clients for the publishing pipeline.
//!
//! Every stage the bulk runner depends on is a capability trait with one
//! production adapter: content generation (OpenRouter), humanization
//! (subprocess script), image candidates (Unsplash source URLs) and the
//! WordPress publish target. The runner only ever sees the traits, so tests
//! swap in scripted fakes.

use async_trait::async_trait;
use thiserror::Error;

use crate::sites::PublishSite;

pub mod generator;
pub mod humanizer;
pub mod images;
pub mod wordpress;

/// Failure of a single external call within the pipeline.
///
/// These are recorded on the affected post record (or skipped, for image
/// uploads) and never propagate past the worker boundary.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Script error: {0}")]
    Script(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Empty response from content generator")]
    EmptyContent,

    #[error("Timed out after {0}s")]
    Timeout(u64),
}

/// Produces long-form article content for a title.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, title: &str) -> Result<GeneratedArticle, StepError>;
}

/// Article text produced by the generator, HTML-formatted.
#[derive(Debug, Clone)]
pub struct GeneratedArticle {
    pub content: String,
    pub word_count: u32,
}

/// Rewrites generated text into a more natural register.
#[async_trait]
pub trait Humanizer: Send + Sync {
    async fn humanize(&self, content: &str) -> Result<String, StepError>;
}

/// Finds candidate image URLs for a topic.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn find_images(&self, topic: &str, count: u32) -> Result<Vec<String>, StepError>;
}

/// Reference to media uploaded to the publish target.
#[derive(Debug, Clone)]
pub struct UploadedMedia {
    pub media_id: u64,
    pub source_url: String,
}

/// A draft ready to be created on the publish target.
#[derive(Debug, Clone)]
pub struct NewPost<'a> {
    pub title: &'a str,
    pub content: &'a str,
    /// Media ids already uploaded to the target, first one becomes featured.
    pub media_ids: &'a [u64],
}

/// The remote publish target (a WordPress-compatible REST API).
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Verifies the site accepts the configured credentials. Called once per
    /// job before any row is processed; failure is a job-level fault.
    async fn validate_credentials(&self, site: &PublishSite) -> Result<(), StepError>;

    /// Downloads `image_url` and sideloads it into the target's media library.
    async fn upload_image(
        &self,
        site: &PublishSite,
        image_url: &str,
        filename: &str,
    ) -> Result<UploadedMedia, StepError>;

    /// Creates a published post and returns its live URL.
    async fn create_post(&self, site: &PublishSite, post: NewPost<'_>)
        -> Result<String, StepError>;
}
