//! Report export — per-row outcomes as a downloadable CSV.

use anyhow::Result;

use crate::bulk::models::{BulkImportJob, PostStatus};

const HEADERS: [&str; 5] = [
    "title",
    "status",
    "images_found",
    "images_uploaded",
    "link_or_error",
];

/// Renders the job's posts as CSV, one row per post in original row order.
pub fn render_csv(job: &BulkImportJob) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    for post in &job.posts {
        let link_or_error = match post.status {
            PostStatus::Published => post.wordpress_post_url.clone().unwrap_or_default(),
            PostStatus::Failed => post.error_message.clone().unwrap_or_default(),
            _ => String::new(),
        };
        writer.write_record([
            post.title.as_str(),
            post.status.as_str(),
            &post.image_count.to_string(),
            &post.uploaded_images.to_string(),
            link_or_error.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV report: {}", e.error()))
}

/// Attachment filename for the report download.
pub fn report_filename(job: &BulkImportJob) -> String {
    format!("bulk-import-{}.csv", job.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bulk::models::{BulkImportJob, PostOutcome};
    use crate::bulk::store::JobStore;

    fn finished_job() -> BulkImportJob {
        let store = JobStore::new();
        let id = store.insert(BulkImportJob::new(
            "site-1".to_string(),
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
        ));
        store.apply_post_outcome(
            id,
            0,
            PostOutcome::Published {
                url: "https://blog.example.com/a".to_string(),
            },
        );
        store.apply_post_outcome(
            id,
            1,
            PostOutcome::Failed {
                error: "Content generation failed".to_string(),
            },
        );
        store.apply_post_outcome(
            id,
            2,
            PostOutcome::Published {
                url: "https://blog.example.com/c".to_string(),
            },
        );
        store.get(id).unwrap()
    }

    #[test]
    fn test_one_row_per_post_in_row_order() {
        let job = finished_job();
        let bytes = render_csv(&job).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 1 + job.total_posts as usize);
        assert_eq!(lines[0], "title,status,images_found,images_uploaded,link_or_error");
        assert!(lines[1].starts_with("A,published"));
        assert!(lines[2].starts_with("B,failed"));
        assert!(lines[3].starts_with("C,published"));
    }

    #[test]
    fn test_failed_row_carries_error_and_published_row_carries_link() {
        let job = finished_job();
        let text = String::from_utf8(render_csv(&job).unwrap()).unwrap();
        assert!(text.contains("https://blog.example.com/a"));
        assert!(text.contains("Content generation failed"));
    }

    #[test]
    fn test_filename_contains_job_id() {
        let job = finished_job();
        assert_eq!(report_filename(&job), format!("bulk-import-{}.csv", job.id));
    }
}
