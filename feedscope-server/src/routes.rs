//! Route definitions for the Feedscope server.
//!
//! Provides the HTTP surface over the session: batch analysis, running
//! results, session report, reset, spoken digest, and similarity lookup.

use crate::digest;
use crate::indexer::{self, IndexJob, Indexer};
use crate::report;
use crate::session::{SessionState, SharedSession};
use crate::summary::{stamp_full_text, RunningSummary};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use chrono::Utc;
use feedscope_analyzer::{Analyzer, BatchAnalysis, FullReport, SpeechSynthesizer};
use feedscope_common::Error;
use feedscope_index::{ScoredPost, VectorIndex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub session: SharedSession,
    pub analyzer: Arc<dyn Analyzer>,
    pub index: Arc<dyn VectorIndex>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub indexer: Indexer,
}

impl AppState {
    /// Wire up the state and spawn the background indexing worker.
    pub fn new(
        analyzer: Arc<dyn Analyzer>,
        index: Arc<dyn VectorIndex>,
        speech: Arc<dyn SpeechSynthesizer>,
        queue_capacity: usize,
    ) -> Self {
        let indexer = Indexer::spawn(analyzer.clone(), index.clone(), queue_capacity);
        Self {
            session: Arc::new(Mutex::new(SessionState::default())),
            analyzer,
            index,
            speech,
            indexer,
        }
    }
}

/// Batch analysis request body.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub tweets: Vec<String>,
}

/// Similarity query request body.
#[derive(Debug, Deserialize)]
pub struct SimilarRequest {
    pub text: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

const fn default_top_k() -> usize {
    5
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Reset response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub status: String,
}

/// Reindex response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReindexResponse {
    pub status: String,
    pub indexed: usize,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: Error) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if !err.is_not_found() {
        tracing::error!(error = %err, "Request failed");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: err.code().into(),
        }),
    )
}

/// Build the complete router with all routes.
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/results", get(results_handler))
        .route("/health", get(health_handler))
        .route("/debug", get(debug_handler))
        .route("/full-report", post(full_report_handler))
        .route("/reset", delete(reset_handler))
        .route("/audio", get(audio_handler))
        .route("/similar", post(similar_handler))
        .route("/reindex", post(reindex_handler))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Analysis Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Analyze one batch: append to the session, score it, fold the result into
/// the running summary, then hand the batch to the background indexer. The
/// fold is committed before indexing is even enqueued, so an indexing
/// failure can never roll back aggregation.
async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<BatchAnalysis>, ApiError> {
    let start_index = state.session.lock().await.append(&request.tweets);

    let mut analysis = state
        .analyzer
        .analyze_batch(&request.tweets)
        .await
        .map_err(error_response)?;

    stamp_full_text(&mut analysis.per_tweet, &request.tweets);

    {
        let mut session = state.session.lock().await;
        session.summary.fold(&analysis, Utc::now());
        tracing::info!(
            batch_count = session.summary.batch_count,
            posts = request.tweets.len(),
            score = analysis.overall_manipulation_score,
            "Batch aggregated"
        );
    }

    state.indexer.enqueue(IndexJob {
        posts: request.tweets,
        start_id: start_index as u64,
    });

    Ok(Json(analysis))
}

/// Current running summary; 404 until the first batch has been analyzed.
async fn results_handler(
    State(state): State<AppState>,
) -> Result<Json<RunningSummary>, ApiError> {
    let session = state.session.lock().await;
    if session.summary.batch_count == 0 {
        return Err(error_response(Error::NoAnalysis));
    }
    Ok(Json(session.summary.clone()))
}

/// Liveness probe.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

/// Raw running summary, unconditionally.
async fn debug_handler(State(state): State<AppState>) -> Json<RunningSummary> {
    Json(state.session.lock().await.summary.clone())
}

// ─────────────────────────────────────────────────────────────────────────────
// Report / Digest Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Synthesize the whole-session narrative report.
async fn full_report_handler(
    State(state): State<AppState>,
) -> Result<Json<FullReport>, ApiError> {
    let posts = state.session.lock().await.posts.clone();
    let report = report::synthesize(state.analyzer.as_ref(), &posts)
        .await
        .map_err(error_response)?;
    Ok(Json(report))
}

/// Spoken digest of the running summary, streamed back as audio.
async fn audio_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let summary = {
        let session = state.session.lock().await;
        if session.summary.feed_summary.is_empty() && session.posts.is_empty() {
            return Err(error_response(Error::NoAnalysis));
        }
        session.summary.clone()
    };

    let script = digest::digest_script(&summary);
    let audio = state
        .speech
        .synthesize(&script)
        .await
        .map_err(error_response)?;

    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (header::CONTENT_DISPOSITION, "inline; filename=digest.mp3"),
        ],
        bytes::Bytes::from(audio),
    ))
}

// ─────────────────────────────────────────────────────────────────────────────
// Session / Index Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Clear the session and summary, then the vector collection. Local state is
/// cleared first so a collection failure never leaves stale posts behind.
async fn reset_handler(State(state): State<AppState>) -> Result<Json<ResetResponse>, ApiError> {
    state.session.lock().await.reset();
    state.index.clear().await.map_err(error_response)?;

    tracing::info!("Session reset");
    Ok(Json(ResetResponse {
        status: "reset".into(),
    }))
}

/// Similarity lookup over the indexed session posts.
async fn similar_handler(
    State(state): State<AppState>,
    Json(request): Json<SimilarRequest>,
) -> Result<Json<Vec<ScoredPost>>, ApiError> {
    let results = indexer::find_similar(
        state.analyzer.as_ref(),
        state.index.as_ref(),
        &request.text,
        request.top_k,
    )
    .await
    .map_err(error_response)?;

    Ok(Json(results))
}

/// Re-embed and re-upsert the entire session history from identifier 0.
/// Recovers vector-index consistency after silent indexing failures.
async fn reindex_handler(
    State(state): State<AppState>,
) -> Result<Json<ReindexResponse>, ApiError> {
    let posts = state.session.lock().await.posts.clone();
    if posts.is_empty() {
        return Err(error_response(Error::EmptySession));
    }

    let indexed =
        indexer::index_posts(state.analyzer.as_ref(), state.index.as_ref(), &posts, 0).await;

    Ok(Json(ReindexResponse {
        status: "ok".into(),
        indexed,
    }))
}
