//! Image candidates — topic-keyed Unsplash source URLs.
//!
//! Unsplash's source endpoint redirects each URL to a real photo matching the
//! query, so candidates can be constructed without an API key; the `sig`
//! parameter de-duplicates photos within one post.

use async_trait::async_trait;

use crate::clients::{ImageProvider, StepError};

const UNSPLASH_SOURCE_URL: &str = "https://source.unsplash.com/800x600";

#[derive(Clone, Default)]
pub struct UnsplashSourceProvider;

impl UnsplashSourceProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageProvider for UnsplashSourceProvider {
    async fn find_images(&self, topic: &str, count: u32) -> Result<Vec<String>, StepError> {
        let query = urlencode(topic);
        Ok((0..count)
            .map(|i| format!("{UNSPLASH_SOURCE_URL}/?{query}&sig={i}"))
            .collect())
    }
}

/// Minimal percent-encoding for a query value (space → %20 etc.).
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_requested_number_of_candidates() {
        let provider = UnsplashSourceProvider::new();
        let images = provider.find_images("email marketing", 4).await.unwrap();
        assert_eq!(images.len(), 4);
        assert!(images[0].contains("email%20marketing"));
        // Distinct sig per candidate
        assert_ne!(images[0], images[3]);
    }

    #[test]
    fn test_urlencode_leaves_safe_chars() {
        assert_eq!(urlencode("abc-123_~.x"), "abc-123_~.x");
        assert_eq!(urlencode("a b&c"), "a%20b%26c");
    }
}
