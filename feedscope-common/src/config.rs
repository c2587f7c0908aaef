//! Configuration management for Feedscope services.
//!
//! Configuration is read from `~/.feedscope/config.json` when present, with
//! environment variables taking precedence over file values.
//!
//! # Environment Variable Mapping
//!
//! - `FEEDSCOPE_HOST` → server.host
//! - `FEEDSCOPE_PORT` → server.port
//! - `GEMINI_API_KEY` / `GOOGLE_API_KEY` → analyzer.api_key
//! - `ELEVENLABS_API_KEY` → speech.api_key
//! - `QDRANT_URL` → index.url
//! - `FEEDSCOPE_COLLECTION` → index.collection

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".feedscope"),
        |dirs| dirs.home_dir().join(".feedscope"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address. Default: "127.0.0.1" (local only)
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}

const fn default_port() -> u16 {
    8000
}

/// Analyzer (Gemini) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// API key; falls back to GEMINI_API_KEY / GOOGLE_API_KEY env vars
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for batch analysis and reports
    #[serde(default = "default_analysis_model")]
    pub model: String,

    /// Model used for embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_analysis_model(),
            embedding_model: default_embedding_model(),
        }
    }
}

fn default_analysis_model() -> String {
    "gemini-2.5-flash-lite".into()
}

fn default_embedding_model() -> String {
    "gemini-embedding-001".into()
}

/// Vector index (Qdrant) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Qdrant server URL
    #[serde(default = "default_index_url")]
    pub url: String,

    /// Collection name
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Vector dimensionality; must match the embedding model's output
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Capacity of the background indexing queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: default_index_url(),
            collection: default_collection(),
            dimension: default_dimension(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_index_url() -> String {
    "http://localhost:6334".into()
}

fn default_collection() -> String {
    "tweets".into()
}

const fn default_dimension() -> usize {
    3072
}

const fn default_queue_capacity() -> usize {
    64
}

/// Speech synthesizer (ElevenLabs) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// API key; falls back to ELEVENLABS_API_KEY env var
    #[serde(default)]
    pub api_key: Option<String>,

    /// Voice identifier
    #[serde(default = "default_voice_id")]
    pub voice_id: String,

    /// TTS model
    #[serde(default = "default_speech_model")]
    pub model: String,

    /// Audio output format
    #[serde(default = "default_output_format")]
    pub output_format: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            voice_id: default_voice_id(),
            model: default_speech_model(),
            output_format: default_output_format(),
        }
    }
}

fn default_voice_id() -> String {
    "onwK4e9ZLuTAKqWW03F9".into()
}

fn default_speech_model() -> String {
    "eleven_turbo_v2".into()
}

fn default_output_format() -> String {
    "mp3_44100_128".into()
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Base log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output format: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

/// Top-level Feedscope configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path with env overrides.
    pub fn load() -> Result<Self> {
        let path = config_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from an explicit file path (no env overrides).
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("FEEDSCOPE_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("FEEDSCOPE_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.analyzer.api_key = Some(key);
        } else if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            self.analyzer.api_key = Some(key);
        }
        if let Ok(key) = std::env::var("ELEVENLABS_API_KEY") {
            self.speech.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("QDRANT_URL") {
            self.index.url = url;
        }
        if let Ok(collection) = std::env::var("FEEDSCOPE_COLLECTION") {
            self.index.collection = collection;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.analyzer.model, "gemini-2.5-flash-lite");
        assert_eq!(config.analyzer.embedding_model, "gemini-embedding-001");
        assert_eq!(config.index.collection, "tweets");
        assert_eq!(config.index.dimension, 3072);
        assert_eq!(config.speech.model, "eleven_turbo_v2");
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"server": {"port": 9100}, "index": {"collection": "posts"}}"#)
            .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.index.collection, "posts");
        assert_eq!(config.index.dimension, 3072);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
