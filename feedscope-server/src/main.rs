//! Feedscope Server - Main entry point.

use anyhow::{Context, Result};
use feedscope_analyzer::{ElevenLabsClient, GeminiClient};
use feedscope_common::logging::init_logging;
use feedscope_common::Config;
use feedscope_index::QdrantIndex;
use feedscope_server::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    tracing::info!("Feedscope Server v{}", env!("CARGO_PKG_VERSION"));

    let gemini_key = config
        .analyzer
        .api_key
        .clone()
        .context("Gemini API key not configured. Set GEMINI_API_KEY or analyzer.api_key")?;
    let elevenlabs_key = config
        .speech
        .api_key
        .clone()
        .context("ElevenLabs API key not configured. Set ELEVENLABS_API_KEY or speech.api_key")?;

    let analyzer = Arc::new(GeminiClient::new(
        &gemini_key,
        &config.analyzer.model,
        &config.analyzer.embedding_model,
    ));

    let index = Arc::new(
        QdrantIndex::connect(
            &config.index.url,
            &config.index.collection,
            config.index.dimension,
        )
        .await?,
    );

    let speech = Arc::new(ElevenLabsClient::new(
        &elevenlabs_key,
        &config.speech.voice_id,
        &config.speech.model,
        &config.speech.output_format,
    ));

    let state = AppState::new(analyzer, index, speech, config.index.queue_capacity);

    feedscope_server::start_server(&config, state).await
}
