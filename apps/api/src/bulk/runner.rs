//! Job Runner — drives one bulk import job from `pending` to a terminal state.
//!
//! Flow per post: generate → humanize → fetch image candidates → upload
//! images → create post. Posts are processed strictly sequentially in row
//! order; each external call gets exactly one attempt. A failed step
//! terminalizes that post only — the job itself always reaches `completed`
//! once row processing has begun. Job-level `failed` is reserved for the
//! credential preflight rejecting the target site before any row starts.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::bulk::models::{JobStatus, PostOutcome, PostStatus};
use crate::bulk::store::JobStore;
use crate::clients::{ContentGenerator, Humanizer, ImageProvider, NewPost, Publisher};
use crate::notify::{notify_best_effort, Notifier};
use crate::sites::PublishSite;

pub struct JobRunner {
    store: JobStore,
    generator: Arc<dyn ContentGenerator>,
    humanizer: Arc<dyn Humanizer>,
    images: Arc<dyn ImageProvider>,
    publisher: Arc<dyn Publisher>,
    notifier: Arc<dyn Notifier>,
    images_per_post: u32,
}

impl JobRunner {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: JobStore,
        generator: Arc<dyn ContentGenerator>,
        humanizer: Arc<dyn Humanizer>,
        images: Arc<dyn ImageProvider>,
        publisher: Arc<dyn Publisher>,
        notifier: Arc<dyn Notifier>,
        images_per_post: u32,
    ) -> Self {
        Self {
            store,
            generator,
            humanizer,
            images,
            publisher,
            notifier,
            images_per_post,
        }
    }

    /// Starts the job on a background task and returns immediately.
    pub fn spawn(self: &Arc<Self>, site: PublishSite, job_id: Uuid) {
        let runner = Arc::clone(self);
        tokio::spawn(async move {
            runner.run(site, job_id).await;
        });
    }

    /// Runs the whole job. Deleting the job mid-run only removes visibility;
    /// this task keeps going and its remaining writes are discarded by the
    /// store.
    pub async fn run(&self, site: PublishSite, job_id: Uuid) {
        let Some(snapshot) = self.store.get(job_id) else {
            return;
        };
        let titles: Vec<String> = snapshot.posts.iter().map(|p| p.title.clone()).collect();
        let total = titles.len();

        // Credential preflight: the one condition that fails the job itself.
        self.store
            .set_current_step(job_id, format!("Validating credentials for {}", site.name));
        if let Err(e) = self.publisher.validate_credentials(&site).await {
            warn!("Job {job_id}: credential validation failed: {e}");
            self.store
                .set_current_step(job_id, format!("Credential validation failed: {e}"));
            self.store.set_job_status(job_id, JobStatus::Failed);
            self.finish_notification(job_id).await;
            return;
        }

        self.store.set_job_status(job_id, JobStatus::Processing);
        info!("Job {job_id}: processing {total} posts for site '{}'", site.id);

        for (index, title) in titles.iter().enumerate() {
            let outcome = self.process_post(&site, job_id, index, title).await;
            match &outcome {
                PostOutcome::Published { url } => {
                    info!("Job {job_id}: post {}/{total} published at {url}", index + 1)
                }
                PostOutcome::Failed { error } => {
                    warn!("Job {job_id}: post {}/{total} failed: {error}", index + 1)
                }
            }
            self.store.apply_post_outcome(job_id, index, outcome);
            self.store
                .set_current_step(job_id, format!("Processed {} of {total} posts", index + 1));
        }

        self.store.set_current_step(job_id, "Completed");
        self.store.set_job_status(job_id, JobStatus::Completed);
        info!("Job {job_id}: completed");
        self.finish_notification(job_id).await;
    }

    /// Runs one row through the pipeline and returns its terminal outcome.
    /// Every step error ends up in the outcome, never propagated upward.
    async fn process_post(
        &self,
        site: &PublishSite,
        job_id: Uuid,
        index: usize,
        title: &str,
    ) -> PostOutcome {
        self.store.set_post_status(job_id, index, PostStatus::Generating);
        self.store
            .set_current_step(job_id, format!("Generating content for '{title}'"));

        let article = match self.generator.generate(title).await {
            Ok(a) => a,
            Err(e) => {
                return PostOutcome::Failed {
                    error: format!("Content generation failed: {e}"),
                }
            }
        };

        self.store
            .set_current_step(job_id, format!("Humanizing content for '{title}'"));
        let content = match self.humanizer.humanize(&article.content).await {
            Ok(c) => c,
            Err(e) => {
                return PostOutcome::Failed {
                    error: format!("Humanization failed: {e}"),
                }
            }
        };

        self.store
            .set_current_step(job_id, format!("Fetching images for '{title}'"));
        let candidates = match self.images.find_images(title, self.images_per_post).await {
            Ok(urls) => urls,
            Err(e) => {
                return PostOutcome::Failed {
                    error: format!("Image search failed: {e}"),
                }
            }
        };
        self.store
            .set_post_image_count(job_id, index, candidates.len() as u32);

        self.store.set_post_status(job_id, index, PostStatus::Publishing);
        self.store
            .set_current_step(job_id, format!("Publishing '{title}'"));

        // A rejected image is skipped, not fatal: the post ships with
        // whatever media made it through.
        let mut media_ids = Vec::new();
        for (i, url) in candidates.iter().enumerate() {
            let filename = format!("{}-{i}.jpg", slugify(title));
            match self.publisher.upload_image(site, url, &filename).await {
                Ok(media) => {
                    media_ids.push(media.media_id);
                    self.store.increment_uploaded_images(job_id, index);
                }
                Err(e) => warn!("Job {job_id}: image upload skipped for '{title}': {e}"),
            }
        }

        let post = NewPost {
            title,
            content: &content,
            media_ids: &media_ids,
        };
        match self.publisher.create_post(site, post).await {
            Ok(url) => PostOutcome::Published { url },
            Err(e) => PostOutcome::Failed {
                error: format!("Publish failed: {e}"),
            },
        }
    }

    async fn finish_notification(&self, job_id: Uuid) {
        // Snapshot may be gone if the caller deleted the job mid-run.
        if let Some(job) = self.store.get(job_id) {
            notify_best_effort(self.notifier.as_ref(), &job).await;
        }
    }
}

/// Lowercase-dashed filename stem from a post title.
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        "post".to_string()
    } else {
        slug
    }
}
