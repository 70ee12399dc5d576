//! OpenRouter content generator — the single point of entry for LLM calls.
//!
//! Model: anthropic/claude-3-haiku (hardcoded — do not make configurable to
//! prevent drift between articles generated in the same job).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clients::{ContentGenerator, GeneratedArticle, StepError};

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
/// The model used for all article generation.
pub const MODEL: &str = "anthropic/claude-3-haiku";
const MAX_TOKENS: u32 = 8000;
const TEMPERATURE: f32 = 0.7;
/// Minimum word count requested from the model per article.
pub const DEFAULT_MIN_WORDS: u32 = 1500;
pub const DEFAULT_TONE: &str = "professional";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Generator backed by the OpenRouter chat completions API.
#[derive(Clone)]
pub struct OpenRouterGenerator {
    client: Client,
    api_key: String,
    referer: String,
    timeout_secs: u64,
}

impl OpenRouterGenerator {
    pub fn new(api_key: String, referer: String, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            referer,
            timeout_secs,
        }
    }

    /// One chat completion call; each caller gets exactly one attempt.
    pub async fn complete(&self, prompt: &str) -> Result<GeneratedArticle, StepError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", "Pressline")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StepError::Timeout(self.timeout_secs)
                } else {
                    StepError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StepError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        if let Some(err) = parsed.error {
            return Err(StepError::Api {
                status: status.as_u16(),
                message: err.message,
            });
        }

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(StepError::EmptyContent)?;

        let word_count = count_words(&content);
        debug!("Generated {word_count} words");

        Ok(GeneratedArticle {
            content,
            word_count,
        })
    }
}

#[async_trait]
impl ContentGenerator for OpenRouterGenerator {
    async fn generate(&self, title: &str) -> Result<GeneratedArticle, StepError> {
        let prompt = article_prompt(title, DEFAULT_TONE, DEFAULT_MIN_WORDS);
        self.complete(&prompt).await
    }
}

/// Builds the article prompt. The anti-AI-tell style directives matter for
/// downstream humanization: the fewer stock phrases the generator emits, the
/// less the humanizer has to rewrite.
pub fn article_prompt(topic: &str, tone: &str, min_words: u32) -> String {
    format!(
        r#"You are an expert content writer. Write a comprehensive, SEO-optimized article about "{topic}".

STRICT REQUIREMENTS:
- Write MINIMUM {min_words} words (this is mandatory)
- Tone: {tone}
- Start with an engaging introduction that hooks the reader
- Use proper HTML headings: <h2> for main sections, <h3> for subsections
- Include bullet points (<ul><li>) and numbered lists (<ol><li>) where appropriate
- Add real statistics, facts, and data points
- Write in a natural, human conversational style
- Include a compelling conclusion with call-to-action

IMPORTANT WRITING STYLE:
- Write like a human expert, NOT like AI
- AVOID these phrases: "In today's world", "It's important to note", "In conclusion", "Let's dive in", "Without further ado"
- Use short paragraphs (2-3 sentences max)
- Include personal insights and opinions
- Use active voice
- Add rhetorical questions to engage readers

FORMAT: Write in clean HTML format with proper <h2>, <h3>, <p>, <ul>, <ol>, <li> tags.

Now write the complete {min_words}+ word article:"#
    )
}

/// Counts words in HTML content, ignoring the tags themselves.
pub fn count_words(html: &str) -> u32 {
    let mut in_tag = false;
    let mut text = String::with_capacity(html.len());
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                text.push(' ');
            }
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.split_whitespace().count() as u32
}

/// Derives a display title from a raw topic (first letter capitalized).
pub fn title_from_topic(topic: &str) -> String {
    let mut chars = topic.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
