//! moodmix-mm library - Mood Matcher module
//!
//! Recommends songs from a fixed catalog for a self-reported mood or an
//! explicit six-feature query, ranked by L1 distance.

use axum::Router;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod catalog;
pub mod error;
pub mod matcher;
pub mod mood;
pub mod pagination;

pub use catalog::{Catalog, CatalogEntry};
pub use matcher::{recommend, recommend_tokens, MatchError, RankedResult};
pub use mood::Mood;

/// Module name reported by the health endpoint
pub const MODULE_NAME: &str = "moodmix-mm";

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable song catalog, loaded once at startup
    pub catalog: Catalog,
    /// Result count used when a request omits `k`
    pub default_result_count: usize,
}

impl AppState {
    /// Create new application state
    pub fn new(catalog: Catalog, default_result_count: usize) -> Self {
        Self {
            catalog,
            default_result_count,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/api/catalog", get(api::catalog_summary))
        .route("/api/catalog/songs", get(api::list_songs))
        .route("/api/catalog/songs/:guid", get(api::get_song))
        .route("/api/moods", get(api::list_moods))
        .route(
            "/api/recommend",
            get(api::recommend_by_query).post(api::recommend_by_body),
        )
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
