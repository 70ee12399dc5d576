//! WordPress REST client — the production publish target adapter.
//!
//! Talks to `/wp-json/wp/v2` with Basic auth (username + application
//! password). Media is sideloaded: the candidate URL is downloaded here and
//! its bytes re-uploaded, because most WordPress installs refuse to fetch
//! remote URLs themselves.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::clients::{NewPost, Publisher, StepError, UploadedMedia};
use crate::sites::PublishSite;

#[derive(Debug, Deserialize)]
struct MediaResponse {
    id: u64,
    source_url: String,
}

#[derive(Debug, Deserialize)]
struct PostResponse {
    link: String,
}

#[derive(Clone)]
pub struct WordPressClient {
    client: Client,
    timeout_secs: u64,
}

impl WordPressClient {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .expect("Failed to build HTTP client"),
            timeout_secs,
        }
    }

    fn api_url(site: &PublishSite, path: &str) -> String {
        let base = site.base_url.trim_end_matches('/');
        format!("{base}/wp-json/wp/v2/{path}")
    }

    fn map_send_error(&self, e: reqwest::Error) -> StepError {
        if e.is_timeout() {
            StepError::Timeout(self.timeout_secs)
        } else {
            StepError::Http(e)
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StepError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StepError::Api {
            status: status.as_u16(),
            message: body,
        })
    }
}

#[async_trait]
impl Publisher for WordPressClient {
    async fn validate_credentials(&self, site: &PublishSite) -> Result<(), StepError> {
        let response = self
            .client
            .get(Self::api_url(site, "users/me"))
            .basic_auth(&site.username, Some(&site.app_password))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        Self::check_status(response).await?;
        debug!("Credentials accepted by {}", site.base_url);
        Ok(())
    }

    async fn upload_image(
        &self,
        site: &PublishSite,
        image_url: &str,
        filename: &str,
    ) -> Result<UploadedMedia, StepError> {
        // Fetch the candidate bytes first; a dead image URL fails the upload,
        // which the worker treats as skip-this-image.
        let image = self
            .client
            .get(image_url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let image = Self::check_status(image).await?;
        let content_type = image
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = image.bytes().await?;

        let response = self
            .client
            .post(Self::api_url(site, "media"))
            .basic_auth(&site.username, Some(&site.app_password))
            .header("Content-Type", content_type)
            .header(
                "Content-Disposition",
                format!("attachment; filename=\"{filename}\""),
            )
            .body(bytes)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let media: MediaResponse = Self::check_status(response).await?.json().await?;
        debug!("Uploaded media {} to {}", media.id, site.base_url);

        Ok(UploadedMedia {
            media_id: media.id,
            source_url: media.source_url,
        })
    }

    async fn create_post(
        &self,
        site: &PublishSite,
        post: NewPost<'_>,
    ) -> Result<String, StepError> {
        let mut body = json!({
            "title": post.title,
            "content": post.content,
            "status": "publish",
        });
        if let Some(first) = post.media_ids.first() {
            body["featured_media"] = json!(first);
        }

        let response = self
            .client
            .post(Self::api_url(site, "posts"))
            .basic_auth(&site.username, Some(&site.app_password))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let created: PostResponse = Self::check_status(response).await?.json().await?;
        Ok(created.link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(base_url: &str) -> PublishSite {
        PublishSite {
            id: "s1".to_string(),
            name: "Test".to_string(),
            base_url: base_url.to_string(),
            username: "admin".to_string(),
            app_password: "pw".to_string(),
        }
    }

    #[test]
    fn test_api_url_handles_trailing_slash() {
        let with = site("https://blog.example.com/");
        let without = site("https://blog.example.com");
        assert_eq!(
            WordPressClient::api_url(&with, "posts"),
            "https://blog.example.com/wp-json/wp/v2/posts"
        );
        assert_eq!(
            WordPressClient::api_url(&without, "users/me"),
            "https://blog.example.com/wp-json/wp/v2/users/me"
        );
    }
}
