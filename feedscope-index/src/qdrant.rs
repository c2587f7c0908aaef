//! Qdrant-backed vector index.
//!
//! Requires a running Qdrant instance. The collection is created on connect
//! with cosine distance and the configured dimensionality; `clear` recreates
//! it from scratch.

use crate::{ScoredPost, VectorIndex};
use async_trait::async_trait;
use feedscope_common::{Error, Result};
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use std::collections::HashMap;

/// Qdrant-backed post index.
pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
    dimension: usize,
}

impl QdrantIndex {
    /// Connect to a Qdrant instance and ensure the collection exists.
    ///
    /// # Arguments
    /// * `url` - Qdrant server URL (e.g., "http://localhost:6334")
    /// * `collection` - Name of the collection to use
    /// * `dimension` - Vector dimensionality; must match the embedding output
    pub async fn connect(url: &str, collection: &str, dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(Error::Config(
                "Vector index dimension must be non-zero".into(),
            ));
        }

        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| Error::VectorIndex(format!("Failed to connect to Qdrant: {e}")))?;

        let index = Self {
            client,
            collection: collection.to_string(),
            dimension,
        };

        index.ensure_collection().await?;

        Ok(index)
    }

    /// Ensure the collection exists with correct configuration.
    async fn ensure_collection(&self) -> Result<()> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| Error::VectorIndex(e.to_string()))?;
        let exists = collections
            .collections
            .iter()
            .any(|c| c.name == self.collection);

        if !exists {
            tracing::info!(collection = %self.collection, dimension = self.dimension, "Creating Qdrant collection");

            let vector_params =
                VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine);

            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection).vectors_config(vector_params),
                )
                .await
                .map_err(|e| Error::VectorIndex(e.to_string()))?;
        }

        Ok(())
    }

    /// Build a point with the post text as payload.
    fn create_point(id: u64, vector: Vec<f32>, text: &str) -> PointStruct {
        use qdrant_client::qdrant::value::Kind;
        use qdrant_client::qdrant::Value;

        let payload: HashMap<String, Value> = [(
            "text".to_string(),
            Value {
                kind: Some(Kind::StringValue(text.to_string())),
            },
        )]
        .into_iter()
        .collect();

        PointStruct::new(id, vector, payload)
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn upsert(&self, id: u64, vector: Vec<f32>, text: &str) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(Error::VectorIndex(format!(
                "Vector dimension mismatch: expected {}, got {}",
                self.dimension,
                vector.len()
            )));
        }

        let point = Self::create_point(id, vector, text);

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]).wait(true))
            .await
            .map_err(|e| Error::VectorIndex(e.to_string()))?;

        tracing::debug!(id, collection = %self.collection, "Upserted post vector");
        Ok(())
    }

    async fn search(&self, vector: Vec<f32>, top_k: usize) -> Result<Vec<ScoredPost>> {
        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector, top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| Error::VectorIndex(e.to_string()))?;

        let posts = results
            .result
            .into_iter()
            .filter_map(|point| {
                let id = match point.id.as_ref()?.point_id_options.as_ref()? {
                    PointIdOptions::Num(n) => *n,
                    PointIdOptions::Uuid(_) => return None,
                };
                let text = point
                    .payload
                    .get("text")
                    .and_then(|v| v.as_str())
                    .map(String::to_string)
                    .unwrap_or_default();
                Some(ScoredPost {
                    id,
                    score: point.score,
                    text,
                })
            })
            .collect();

        Ok(posts)
    }

    async fn count(&self) -> Result<usize> {
        let response = self
            .client
            .count(CountPointsBuilder::new(&self.collection).exact(true))
            .await
            .map_err(|e| Error::VectorIndex(e.to_string()))?;

        Ok(response.result.map_or(0, |r| r.count as usize))
    }

    async fn clear(&self) -> Result<()> {
        self.client
            .delete_collection(&self.collection)
            .await
            .map_err(|e| Error::VectorIndex(e.to_string()))?;

        tracing::info!(collection = %self.collection, "Cleared Qdrant collection");
        self.ensure_collection().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_vector(dimension: usize, seed: usize) -> Vec<f32> {
        let mut vec = vec![0.0f32; dimension];
        vec[seed % dimension] = 1.0;
        vec
    }

    #[tokio::test]
    async fn zero_dimension_fails_connect() {
        let result = QdrantIndex::connect("http://localhost:6334", "test", 0).await;
        assert!(result.is_err());
        let message = result.err().unwrap().to_string();
        assert!(message.contains("non-zero"));
    }

    #[tokio::test]
    #[ignore = "requires Qdrant"]
    async fn upsert_and_search_round_trip() {
        let index = QdrantIndex::connect("http://localhost:6334", "test_posts", 8)
            .await
            .expect("Failed to connect to Qdrant");
        index.clear().await.expect("Failed to clear");

        index
            .upsert(0, unit_vector(8, 0), "first post")
            .await
            .expect("Failed to upsert");
        index
            .upsert(1, unit_vector(8, 1), "second post")
            .await
            .expect("Failed to upsert");

        // An identical vector must come back first with the maximum cosine score.
        let results = index
            .search(unit_vector(8, 1), 2)
            .await
            .expect("Failed to search");
        assert_eq!(results[0].id, 1);
        assert_eq!(results[0].text, "second post");
        assert!((results[0].score - 1.0).abs() < 1e-5);

        index.clear().await.ok();
    }

    #[tokio::test]
    #[ignore = "requires Qdrant"]
    async fn upsert_rejects_wrong_dimension() {
        let index = QdrantIndex::connect("http://localhost:6334", "test_posts_dim", 8)
            .await
            .expect("Failed to connect to Qdrant");

        let result = index.upsert(0, vec![1.0; 4], "short vector").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    #[ignore = "requires Qdrant"]
    async fn clear_resets_count() {
        let index = QdrantIndex::connect("http://localhost:6334", "test_posts_clear", 8)
            .await
            .expect("Failed to connect to Qdrant");

        index.upsert(0, unit_vector(8, 0), "a post").await.ok();
        assert!(index.count().await.expect("Failed to count") >= 1);

        index.clear().await.expect("Failed to clear");
        assert_eq!(index.count().await.expect("Failed to count"), 0);
    }
}
