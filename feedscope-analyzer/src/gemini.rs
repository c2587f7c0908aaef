//! Google Gemini client for analysis and embeddings.
//!
//! Talks to the Generative Language REST API directly: `generateContent`
//! for structured analysis and `embedContent` for vectors.

use crate::prompts;
use crate::recover::parse_model_json;
use crate::{Analyzer, BatchAnalysis, FullReport};
use async_trait::async_trait;
use feedscope_common::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini-backed Analyzer.
pub struct GeminiClient {
    api_key: String,
    model: String,
    embedding_model: String,
    base_url: String,
    client: Client,
}

// ══════════════════════════════════════════════════════════════════════════════
// API REQUEST/RESPONSE TYPES
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: Option<Embedding>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Embedding {
    values: Vec<f32>,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(api_key: &str, model: &str, embedding_model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            embedding_model: embedding_model.to_string(),
            base_url: API_BASE.to_string(),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Override the API base URL (for tests against a local server).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Send a generateContent request and return the first candidate's text.
    async fn generate(&self, prompt: &str, temperature: Option<f64>) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: temperature.map(|t| GenerationConfig { temperature: t }),
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Analyzer(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Analyzer(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        tracing::debug!(model = %self.model, "generateContent succeeded");

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Analyzer(format!("Failed to parse response: {e}")))?;

        if let Some(err) = result.error {
            return Err(Error::Analyzer(format!("API error: {}", err.message)));
        }

        result
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| Error::Analyzer("No response from Gemini".into()))
    }
}

#[async_trait]
impl Analyzer for GeminiClient {
    async fn analyze_batch(&self, posts: &[String]) -> Result<BatchAnalysis> {
        let text = self.generate(&prompts::batch_prompt(posts), None).await?;
        parse_model_json(&text)
    }

    async fn full_report(&self, posts: &[String]) -> Result<FullReport> {
        // Deterministic generation: the report summarizes the whole session
        // and must be reproducible for a fixed input.
        let text = self
            .generate(&prompts::report_prompt(posts), Some(0.0))
            .await?;
        parse_model_json(&text)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedContentRequest {
            content: Content {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
        };

        let url = format!(
            "{}/models/{}:embedContent?key={}",
            self.base_url, self.embedding_model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Analyzer(format!("Embedding request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Analyzer(format!(
                "Embedding API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let result: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Analyzer(format!("Failed to parse embedding response: {e}")))?;

        if let Some(err) = result.error {
            return Err(Error::Analyzer(format!("Embedding API error: {}", err.message)));
        }

        result
            .embedding
            .map(|e| e.values)
            .ok_or_else(|| Error::Analyzer("No embedding in response".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_serializes_temperature_only_when_set() {
        let without = GenerateContentRequest {
            contents: vec![],
            generation_config: None,
        };
        let json = serde_json::to_string(&without).unwrap();
        assert!(!json.contains("generationConfig"));

        let with = GenerateContentRequest {
            contents: vec![],
            generation_config: Some(GenerationConfig { temperature: 0.0 }),
        };
        let json = serde_json::to_string(&with).unwrap();
        assert!(json.contains("generationConfig"));
        assert!(json.contains("temperature"));
    }

    #[test]
    fn base_url_override_strips_trailing_slash() {
        let client = GeminiClient::new("key", "model", "embed-model")
            .with_base_url("http://127.0.0.1:9999/");
        assert_eq!(client.base_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn embed_response_parses_values() {
        let raw = r#"{"embedding": {"values": [0.1, 0.2, 0.3]}}"#;
        let parsed: EmbedContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.embedding.unwrap().values.len(), 3);
    }
}
