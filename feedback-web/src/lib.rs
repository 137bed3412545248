//! Web front end for feedback collection.
//!
//! Serves the submission form at `/`, the listing at `/feedback` and a small
//! JSON API under `/api`, all backed by the `feedback` library.

pub mod api;
pub mod pages;
pub mod routes;
pub mod state;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use crate::state::AppState;

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::page_router())
        .nest("/api", api::api_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until the listener fails.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
