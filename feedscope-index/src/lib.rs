//! Feedscope Index - Vector storage for post embeddings.
//!
//! Posts are identified by their submission-order index in the session; the
//! index stores one point per post with the original text as payload. The
//! backing store is Qdrant with cosine distance and a dimensionality fixed
//! at collection creation.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod qdrant;

pub use qdrant::QdrantIndex;

use async_trait::async_trait;
use feedscope_common::Result;
use serde::{Deserialize, Serialize};

/// One ranked similarity result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPost {
    /// Session-order identifier of the stored post
    pub id: u64,
    /// Similarity score for the collection's distance metric
    pub score: f32,
    /// Original post text stored as payload
    pub text: String,
}

/// Opaque create/upsert/search/clear vector storage service.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Store or replace the vector for the post with the given identifier.
    async fn upsert(&self, id: u64, vector: Vec<f32>, text: &str) -> Result<()>;

    /// Return the `top_k` nearest stored posts, best first.
    async fn search(&self, vector: Vec<f32>, top_k: usize) -> Result<Vec<ScoredPost>>;

    /// Number of stored vectors.
    async fn count(&self) -> Result<usize>;

    /// Drop all stored vectors for the collection.
    async fn clear(&self) -> Result<()>;
}
