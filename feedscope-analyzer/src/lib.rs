//! Feedscope Analyzer - LLM collaborator clients.
//!
//! This crate provides the interfaces to the external collaborators that do
//! the actual text understanding:
//! - `Analyzer`: per-batch structured scoring, session reports, embeddings
//!   (Gemini implementation)
//! - `SpeechSynthesizer`: spoken digest rendering (ElevenLabs implementation)
//!
//! Both are traits so the server can run against stubs in tests. Structured
//! output recovery (markdown-fence stripping) lives in `recover`.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod gemini;
pub mod prompts;
pub mod recover;
pub mod speech;
pub mod types;

pub use gemini::GeminiClient;
pub use recover::parse_model_json;
pub use speech::{ElevenLabsClient, SpeechSynthesizer};
pub use types::{
    BatchAnalysis, EmotionalTone, FullReport, ManipulationSignals, PerTweetRecord, PoliticalLean,
};

use async_trait::async_trait;
use feedscope_common::Result;

/// Unified interface to the analysis collaborator.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Score one batch of posts, returning the structured per-batch result.
    async fn analyze_batch(&self, posts: &[String]) -> Result<BatchAnalysis>;

    /// Reduce the full session history into a narrative report.
    ///
    /// Implementations must request deterministic generation.
    async fn full_report(&self, posts: &[String]) -> Result<FullReport>;

    /// Produce an embedding vector for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
