//! Bulk import data model — one job per uploaded spreadsheet, one record per row.
//!
//! Status fields are small forward-only state machines:
//!   job:  pending → processing → {completed | failed}
//!   post: pending → generating → publishing → {published | failed}
//!
//! A job is `completed` once every post is terminal, no matter how many rows
//! failed individually. Job-level `failed` is reserved for faults that prevent
//! any row from being processed (e.g. the target site rejects credentials).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a whole bulk import job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Lifecycle of a single spreadsheet row inside a job.
///
/// Variant order is the transition order; `rank()` gives the monotonicity
/// check something to compare (both terminal states share the top rank).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Pending,
    Generating,
    Publishing,
    Published,
    Failed,
}

impl PostStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PostStatus::Published | PostStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Pending => "pending",
            PostStatus::Generating => "generating",
            PostStatus::Publishing => "publishing",
            PostStatus::Published => "published",
            PostStatus::Failed => "failed",
        }
    }

    /// Position in the forward-only ordering: pending < generating <
    /// publishing < {published, failed}.
    pub fn rank(&self) -> u8 {
        match self {
            PostStatus::Pending => 0,
            PostStatus::Generating => 1,
            PostStatus::Publishing => 2,
            PostStatus::Published | PostStatus::Failed => 3,
        }
    }
}

/// Per-row unit of work and its tracked outcome.
///
/// `wordpress_post_url` is set only on successful publish; `error_message`
/// only on failure. Neither is ever cleared once set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub title: String,
    pub status: PostStatus,
    pub image_count: u32,
    pub uploaded_images: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordpress_post_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl PostRecord {
    pub fn new(title: String) -> Self {
        Self {
            title,
            status: PostStatus::Pending,
            image_count: 0,
            uploaded_images: 0,
            wordpress_post_url: None,
            error_message: None,
        }
    }
}

/// One bulk import run over a single spreadsheet and a single target site.
///
/// Counter invariant at rest: `processed_posts == successful_posts + failed_posts`.
/// `posts` length is fixed at creation (one per valid row, in row order).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportJob {
    pub id: Uuid,
    pub target_site_id: String,
    pub total_posts: u32,
    pub processed_posts: u32,
    pub successful_posts: u32,
    pub failed_posts: u32,
    pub status: JobStatus,
    /// Human-readable description of the in-flight step; overwritten continuously.
    pub current_step: String,
    pub posts: Vec<PostRecord>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl BulkImportJob {
    pub fn new(target_site_id: String, titles: Vec<String>) -> Self {
        let posts: Vec<PostRecord> = titles.into_iter().map(PostRecord::new).collect();
        Self {
            id: Uuid::new_v4(),
            target_site_id,
            total_posts: posts.len() as u32,
            processed_posts: 0,
            successful_posts: 0,
            failed_posts: 0,
            status: JobStatus::Pending,
            current_step: "Queued".to_string(),
            posts,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

/// Terminal outcome of one post, applied to the job in a single store update.
#[derive(Debug, Clone)]
pub enum PostOutcome {
    Published { url: String },
    Failed { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_status_rank_is_forward_only() {
        assert!(PostStatus::Pending.rank() < PostStatus::Generating.rank());
        assert!(PostStatus::Generating.rank() < PostStatus::Publishing.rank());
        assert!(PostStatus::Publishing.rank() < PostStatus::Published.rank());
        assert_eq!(PostStatus::Published.rank(), PostStatus::Failed.rank());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(PostStatus::Published.is_terminal());
        assert!(PostStatus::Failed.is_terminal());
        assert!(!PostStatus::Publishing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }

    #[test]
    fn test_new_job_counts_one_post_per_title() {
        let job = BulkImportJob::new(
            "site-1".to_string(),
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
        );
        assert_eq!(job.total_posts, 3);
        assert_eq!(job.posts.len(), 3);
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.processed_posts, 0);
        assert!(job.completed_at.is_none());
        assert_eq!(job.posts[1].title, "B");
        assert_eq!(job.posts[1].status, PostStatus::Pending);
    }

    #[test]
    fn test_post_record_serializes_camel_case_and_omits_absent_fields() {
        let record = PostRecord::new("Hello".to_string());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["imageCount"], 0);
        assert!(json.get("wordpressPostUrl").is_none());
        assert!(json.get("errorMessage").is_none());
    }
}
