//! Job Store — in-memory map of bulk import jobs.
//!
//! The store is the only shared mutable state between the HTTP surface and the
//! background runners. Each job has a single writer (its runner task), so a
//! process-wide RwLock over the map is enough; every method takes and releases
//! the lock without awaiting.
//!
//! Writes against an id that has been deleted are silently discarded: deleting
//! a job only removes visibility, it never signals the runner to stop.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::bulk::models::{BulkImportJob, JobStatus, PostOutcome, PostStatus};

#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<Uuid, BulkImportJob>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, job: BulkImportJob) -> Uuid {
        let id = job.id;
        self.jobs
            .write()
            .expect("job store lock poisoned")
            .insert(id, job);
        id
    }

    /// Point-in-time snapshot of a job, or None if unknown/deleted.
    pub fn get(&self, id: Uuid) -> Option<BulkImportJob> {
        self.jobs
            .read()
            .expect("job store lock poisoned")
            .get(&id)
            .cloned()
    }

    /// Removes the job record. Returns false if the id was unknown.
    pub fn delete(&self, id: Uuid) -> bool {
        self.jobs
            .write()
            .expect("job store lock poisoned")
            .remove(&id)
            .is_some()
    }

    /// Transitions the job status; stamps `completed_at` on the first terminal
    /// transition.
    pub fn set_job_status(&self, id: Uuid, status: JobStatus) {
        self.with_job(id, |job| {
            job.status = status;
            if status.is_terminal() && job.completed_at.is_none() {
                job.completed_at = Some(chrono::Utc::now());
            }
        });
    }

    /// Overwrites the transient progress description.
    pub fn set_current_step(&self, id: Uuid, step: impl Into<String>) {
        let step = step.into();
        self.with_job(id, |job| job.current_step = step);
    }

    /// Advances one post to a non-terminal status. Statuses only move forward;
    /// a regression is ignored rather than applied.
    pub fn set_post_status(&self, id: Uuid, index: usize, status: PostStatus) {
        self.with_job(id, |job| {
            if let Some(post) = job.posts.get_mut(index) {
                if status.rank() >= post.status.rank() {
                    post.status = status;
                }
            }
        });
    }

    /// Records how many candidate images were found for a post.
    pub fn set_post_image_count(&self, id: Uuid, index: usize, count: u32) {
        self.with_job(id, |job| {
            if let Some(post) = job.posts.get_mut(index) {
                post.image_count = count;
            }
        });
    }

    pub fn increment_uploaded_images(&self, id: Uuid, index: usize) {
        self.with_job(id, |job| {
            if let Some(post) = job.posts.get_mut(index) {
                post.uploaded_images += 1;
            }
        });
    }

    /// Applies one post's terminal outcome and the matching counter bump in a
    /// single critical section, so `processed == successful + failed` holds in
    /// every snapshot a poller can observe.
    pub fn apply_post_outcome(&self, id: Uuid, index: usize, outcome: PostOutcome) {
        self.with_job(id, |job| {
            let Some(post) = job.posts.get_mut(index) else {
                return;
            };
            if post.status.is_terminal() {
                return;
            }
            match outcome {
                PostOutcome::Published { url } => {
                    post.status = PostStatus::Published;
                    post.wordpress_post_url = Some(url);
                    job.successful_posts += 1;
                }
                PostOutcome::Failed { error } => {
                    post.status = PostStatus::Failed;
                    post.error_message = Some(error);
                    job.failed_posts += 1;
                }
            }
            job.processed_posts += 1;
        });
    }

    fn with_job(&self, id: Uuid, f: impl FnOnce(&mut BulkImportJob)) {
        let mut jobs = self.jobs.write().expect("job store lock poisoned");
        if let Some(job) = jobs.get_mut(&id) {
            f(job);
        }
        // Unknown id: the job was deleted mid-flight; drop the write.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bulk::models::BulkImportJob;

    fn store_with_job(titles: &[&str]) -> (JobStore, Uuid) {
        let store = JobStore::new();
        let job = BulkImportJob::new(
            "site-1".to_string(),
            titles.iter().map(|t| t.to_string()).collect(),
        );
        let id = store.insert(job);
        (store, id)
    }

    #[test]
    fn test_insert_and_get_roundtrip() {
        let (store, id) = store_with_job(&["A", "B"]);
        let job = store.get(id).unwrap();
        assert_eq!(job.total_posts, 2);
        assert!(store.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_counter_invariant_across_outcomes() {
        let (store, id) = store_with_job(&["A", "B", "C"]);
        store.apply_post_outcome(
            id,
            0,
            PostOutcome::Published {
                url: "https://example.com/?p=1".to_string(),
            },
        );
        let snap = store.get(id).unwrap();
        assert_eq!(snap.processed_posts, snap.successful_posts + snap.failed_posts);

        store.apply_post_outcome(
            id,
            1,
            PostOutcome::Failed {
                error: "generation failed".to_string(),
            },
        );
        let snap = store.get(id).unwrap();
        assert_eq!(snap.processed_posts, 2);
        assert_eq!(snap.successful_posts, 1);
        assert_eq!(snap.failed_posts, 1);
        assert_eq!(snap.posts[1].error_message.as_deref(), Some("generation failed"));
    }

    #[test]
    fn test_terminal_outcome_applied_once() {
        let (store, id) = store_with_job(&["A"]);
        store.apply_post_outcome(
            id,
            0,
            PostOutcome::Failed {
                error: "boom".to_string(),
            },
        );
        // A second outcome for the same post must not double-count.
        store.apply_post_outcome(
            id,
            0,
            PostOutcome::Published {
                url: "https://example.com/?p=9".to_string(),
            },
        );
        let snap = store.get(id).unwrap();
        assert_eq!(snap.processed_posts, 1);
        assert_eq!(snap.failed_posts, 1);
        assert_eq!(snap.posts[0].status, PostStatus::Failed);
        assert!(snap.posts[0].wordpress_post_url.is_none());
    }

    #[test]
    fn test_post_status_never_regresses() {
        let (store, id) = store_with_job(&["A"]);
        store.set_post_status(id, 0, PostStatus::Publishing);
        store.set_post_status(id, 0, PostStatus::Generating);
        assert_eq!(store.get(id).unwrap().posts[0].status, PostStatus::Publishing);
    }

    #[test]
    fn test_writes_after_delete_are_discarded() {
        let (store, id) = store_with_job(&["A"]);
        assert!(store.delete(id));
        assert!(!store.delete(id));
        store.set_job_status(id, JobStatus::Processing);
        store.apply_post_outcome(
            id,
            0,
            PostOutcome::Published {
                url: "https://example.com/?p=1".to_string(),
            },
        );
        assert!(store.get(id).is_none());
    }

    #[test]
    fn test_completed_at_stamped_once() {
        let (store, id) = store_with_job(&["A"]);
        store.set_job_status(id, JobStatus::Completed);
        let first = store.get(id).unwrap().completed_at.unwrap();
        store.set_job_status(id, JobStatus::Completed);
        assert_eq!(store.get(id).unwrap().completed_at.unwrap(), first);
    }
}
