//! ElevenLabs text-to-speech client.

use async_trait::async_trait;
use feedscope_common::{Error, Result};
use reqwest::Client;
use serde::Serialize;

const API_BASE: &str = "https://api.elevenlabs.io/v1";

/// Speech synthesis collaborator: turns a script into audio bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize the script and return the raw audio payload.
    async fn synthesize(&self, script: &str) -> Result<Vec<u8>>;
}

/// ElevenLabs-backed speech synthesizer.
pub struct ElevenLabsClient {
    api_key: String,
    voice_id: String,
    model: String,
    output_format: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct TtsRequest {
    text: String,
    model_id: String,
}

impl ElevenLabsClient {
    /// Create a new ElevenLabs client.
    pub fn new(api_key: &str, voice_id: &str, model: &str, output_format: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            voice_id: voice_id.to_string(),
            model: model.to_string(),
            output_format: output_format.to_string(),
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
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, script: &str) -> Result<Vec<u8>> {
        let url = format!(
            "{}/text-to-speech/{}?output_format={}",
            self.base_url, self.voice_id, self.output_format
        );

        let request = TtsRequest {
            text: script.to_string(),
            model_id: self.model.clone(),
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Speech(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Speech(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| Error::Speech(format!("Failed to read audio payload: {e}")))?;

        Ok(audio.to_vec())
    }
}
