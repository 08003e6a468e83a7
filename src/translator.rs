use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TranslateError;
use crate::language::TargetLanguage;
use crate::prompt::build_prompt;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Low temperature keeps the model literal so tags survive untouched.
pub const TEMPERATURE: f32 = 0.1;

/// The remote translation function. Returns the model's raw text; callers sanitize it.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        html: &str,
        language: TargetLanguage,
    ) -> Result<String, TranslateError>;
}

/// Gemini request types
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

/// Gemini response types
#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

fn request_body(prompt: String) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![Part { text: prompt }],
        }],
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
        },
    }
}

/// Concatenate the text parts of the first candidate. No candidate means no text.
fn extract_text(resp: GeminiResponse) -> String {
    resp.candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

/// Translator backed by the Gemini `generateContent` endpoint.
pub struct GeminiTranslator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiTranslator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: GEMINI_BASE_URL.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    /// The key travels in a header so it never shows up in URLs or error text.
    fn request(&self, body: &GeminiRequest) -> reqwest::RequestBuilder {
        self.client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
    }
}

/// Decode a 2xx body. Anything unreadable counts as an empty translation.
fn parse_response(raw: &str) -> String {
    match serde_json::from_str::<GeminiResponse>(raw) {
        Ok(parsed) => extract_text(parsed),
        Err(e) => {
            log::warn!("Unreadable Gemini response, treating as empty: {e}");
            String::new()
        }
    }
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn translate(
        &self,
        html: &str,
        language: TargetLanguage,
    ) -> Result<String, TranslateError> {
        if self.api_key.trim().is_empty() {
            return Err(TranslateError::MissingApiKey);
        }

        let body = request_body(build_prompt(html, language));

        let resp = self.request(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(TranslateError::Api { status, body });
        }

        let raw = resp.text().await?;
        let text = parse_response(&raw);
        if text.is_empty() {
            log::warn!("Gemini returned no text for a {language} translation");
        }
        Ok(text)
    }
}
