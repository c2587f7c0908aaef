//! Session state: the ordered post history plus the running summary.
//!
//! Both live behind one mutex so that every mutation is serialized through a
//! single ownership point. Collaborator I/O never happens while the lock is
//! held; handlers take it only to append, fold, or read.

use crate::summary::RunningSummary;
use std::sync::Arc;
use tokio::sync::Mutex;

/// All mutable per-session state.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Every post submitted since the last reset, in submission order. A
    /// post's index in this vector is its identifier for vector storage.
    pub posts: Vec<String>,

    /// The running aggregate over all folded batches.
    pub summary: RunningSummary,
}

impl SessionState {
    /// Append a batch of posts and return the index assigned to the first
    /// one. Callers hold the session lock for the whole call, so concurrent
    /// batches can never receive overlapping index ranges.
    pub fn append(&mut self, posts: &[String]) -> usize {
        let start_index = self.posts.len();
        self.posts.extend_from_slice(posts);
        start_index
    }

    /// Clear the post history and fully reset the running summary.
    pub fn reset(&mut self) {
        self.posts.clear();
        self.summary.reset();
    }
}

/// Shared handle to the session state.
pub type SharedSession = Arc<Mutex<SessionState>>;
