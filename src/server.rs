//! Inbound HTTP surface: one browse page per request

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
};
use tracing::{error, info};

use crate::api::UniqueSource;
use crate::query::{RawParams, normalize};
use crate::render::{render_error_page, render_page};

/// Shared application state.
pub struct AppState {
    pub source: Arc<dyn UniqueSource>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(browse_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    info!("  GET  /        - Browse uniques (page, search, ordering, league)");
    info!("  GET  /health  - Health check");

    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// GET /?page=&search=&ordering=&league=
///
/// Repeated parameters are allowed; the first occurrence wins. A failed fetch
/// renders a generic error page with 502 and never a partial listing.
async fn browse_handler(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let query = normalize(&RawParams::from_pairs(pairs));

    match state.source.fetch_uniques(&query).await {
        Ok(fetched) => Ok(Html(render_page(
            &query,
            &fetched.page,
            fetched.fetched_at,
        ))),
        Err(e) => {
            error!(
                page = %query.page,
                league = %query.league,
                status = ?e.status_code(),
                "Browse request failed: {}",
                e
            );
            Err((StatusCode::BAD_GATEWAY, Html(render_error_page(&query))))
        }
    }
}

/// GET /health
async fn health_handler() -> impl IntoResponse {
    "ok"
}
