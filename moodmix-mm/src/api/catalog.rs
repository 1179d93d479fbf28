//! Catalog browsing
//!
//! Read-only views over the in-memory catalog; nothing here touches the
//! database.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;
use crate::error::{ApiError, ApiResult};
use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CatalogSummary {
    pub total_songs: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Query parameters for song listing
#[derive(Debug, Deserialize)]
pub struct SongsQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

#[derive(Debug, Serialize)]
pub struct SongPage {
    pub total_songs: usize,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub songs: Vec<CatalogEntry>,
}

/// GET /api/catalog
pub async fn catalog_summary(State(state): State<AppState>) -> Json<CatalogSummary> {
    Json(CatalogSummary {
        total_songs: state.catalog.len(),
        loaded_at: state.catalog.loaded_at(),
    })
}

/// GET /api/catalog/songs?page=N
///
/// Songs in catalog order, 100 per page. Out-of-range pages are clamped.
pub async fn list_songs(
    State(state): State<AppState>,
    query: Result<Query<SongsQuery>, QueryRejection>,
) -> ApiResult<Json<SongPage>> {
    let Query(query) = query?;
    let entries = state.catalog.entries();
    let pagination = calculate_pagination(entries.len() as i64, query.page);

    Ok(Json(SongPage {
        total_songs: entries.len(),
        page: pagination.page,
        page_size: PAGE_SIZE,
        total_pages: pagination.total_pages,
        songs: entries[pagination.range(entries.len())].to_vec(),
    }))
}

/// GET /api/catalog/songs/:guid
pub async fn get_song(
    State(state): State<AppState>,
    Path(guid): Path<String>,
) -> ApiResult<Json<CatalogEntry>> {
    state
        .catalog
        .get(&guid)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("song {}", guid)))
}
