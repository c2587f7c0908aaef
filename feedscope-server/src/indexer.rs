//! Embedding adapter: post embedding plus vector-index forwarding.
//!
//! Batch indexing is fire-and-forget relative to the analysis response. A
//! bounded queue feeds a single worker task; a full queue drops the job with
//! a warning rather than blocking `/analyze`. Per-post failures are logged
//! and never stop the rest of the batch or surface to the caller.
//!
//! Similarity queries are the opposite: synchronous, user-requested, and
//! errors propagate.

use feedscope_analyzer::Analyzer;
use feedscope_common::Result;
use feedscope_index::{ScoredPost, VectorIndex};
use std::sync::Arc;
use tokio::sync::mpsc;

/// One batch of posts waiting to be embedded and upserted.
#[derive(Debug)]
pub struct IndexJob {
    pub posts: Vec<String>,
    /// Identifier of the first post (its session index).
    pub start_id: u64,
}

/// Handle to the background indexing worker.
#[derive(Clone)]
pub struct Indexer {
    tx: mpsc::Sender<IndexJob>,
}

impl Indexer {
    /// Spawn the worker task and return a handle for enqueueing jobs.
    pub fn spawn(
        analyzer: Arc<dyn Analyzer>,
        index: Arc<dyn VectorIndex>,
        capacity: usize,
    ) -> Self {
        let (tx, mut rx) = mpsc::channel::<IndexJob>(capacity);

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let indexed =
                    index_posts(analyzer.as_ref(), index.as_ref(), &job.posts, job.start_id).await;
                tracing::debug!(
                    start_id = job.start_id,
                    total = job.posts.len(),
                    indexed,
                    "Indexing job finished"
                );
            }
        });

        Self { tx }
    }

    /// Enqueue a batch for background indexing. Never blocks; a full queue
    /// drops the job (recoverable later via reindex).
    pub fn enqueue(&self, job: IndexJob) {
        if let Err(e) = self.tx.try_send(job) {
            tracing::warn!(error = %e, "Indexing queue full, dropping batch");
        }
    }
}

/// Embed and upsert each post independently, best-effort.
///
/// Post `i` gets identifier `start_id + i`. A failure on one post never
/// prevents the following posts from being attempted. Upserts are retried
/// once before giving up on a post. Returns the number of posts indexed.
pub async fn index_posts(
    analyzer: &dyn Analyzer,
    index: &dyn VectorIndex,
    posts: &[String],
    start_id: u64,
) -> usize {
    let mut indexed = 0;

    for (i, post) in posts.iter().enumerate() {
        let id = start_id + i as u64;

        let vector = match analyzer.embed(post).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to embed post, skipping");
                continue;
            }
        };

        match index.upsert(id, vector.clone(), post).await {
            Ok(()) => indexed += 1,
            Err(first) => {
                // Retry once before giving up on this post.
                match index.upsert(id, vector, post).await {
                    Ok(()) => indexed += 1,
                    Err(e) => {
                        tracing::warn!(id, first = %first, error = %e, "Failed to upsert post vector");
                    }
                }
            }
        }
    }

    indexed
}

/// Embed the query text and forward a similarity search.
pub async fn find_similar(
    analyzer: &dyn Analyzer,
    index: &dyn VectorIndex,
    text: &str,
    top_k: usize,
) -> Result<Vec<ScoredPost>> {
    let vector = analyzer.embed(text).await?;
    index.search(vector, top_k).await
}
