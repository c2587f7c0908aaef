//! Feedscope Server - Streaming aggregation of feed analysis batches.
//!
//! This crate owns the core of the system:
//! - Session store and running summary, serialized behind one lock
//! - Batch aggregator fold (running averages, topic sums, per-post history)
//! - Report synthesis and spoken digest rendering
//! - Background embedding/indexing queue
//! - The HTTP surface over all of it
//!
//! ## Flow
//!
//! ```text
//! POST /analyze → append posts → Analyzer scores batch → fold into summary
//!                                                       ↘ (fire-and-forget)
//!                                                         embed + upsert
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod digest;
pub mod indexer;
pub mod report;
pub mod routes;
pub mod session;
pub mod summary;

pub use routes::{build_routes, AppState};
pub use session::{SessionState, SharedSession};
pub use summary::{stamp_full_text, RunningSummary};

use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use feedscope_common::Config;

/// Build the server router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // The browser extension that feeds this service runs cross-origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::build_routes(state).layer(cors)
}

/// Start the server.
pub async fn start_server(config: &Config, state: AppState) -> anyhow::Result<()> {
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    let router = build_router(state);

    tracing::info!("Starting Feedscope server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
