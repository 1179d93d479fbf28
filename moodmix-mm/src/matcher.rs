//! Mood-to-song nearest-neighbor matching
//!
//! Ranks catalog entries by L1 distance (sum of absolute per-feature
//! differences) to a query [`FeatureVector`]. Linear scan plus a stable
//! sort: equal distances keep catalog order.

use crate::catalog::CatalogEntry;
use moodmix_common::features::FeatureError;
use moodmix_common::FeatureVector;
use serde::Serialize;
use thiserror::Error;

/// Matcher failures; all are recoverable and meant for the caller to report
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// Query vector malformed: wrong arity, unparseable, or non-finite
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] FeatureError),

    /// Result count not positive
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Nothing to rank
    #[error("Catalog is empty")]
    EmptyCatalog,
}

/// A catalog entry with its distance from the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult<'a> {
    pub entry: &'a CatalogEntry,
    pub distance: f64,
}

/// L1 distance between two feature vectors
pub fn distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.to_array()
        .iter()
        .zip(b.to_array())
        .map(|(x, y)| (x - y).abs())
        .sum()
}

/// Convert a caller-supplied count into a positive `usize`
pub fn result_count(k: i64) -> Result<usize, MatchError> {
    if k <= 0 {
        return Err(MatchError::InvalidArgument(format!(
            "k must be a positive integer, got {}",
            k
        )));
    }
    usize::try_from(k)
        .map_err(|_| MatchError::InvalidArgument(format!("k is too large: {}", k)))
}

/// Top-`k` entries closest to `query`, nearest first
///
/// Returns `min(k, catalog.len())` results. Checks `k`, then the catalog,
/// then the query.
pub fn recommend<'a>(
    catalog: &'a [CatalogEntry],
    query: &FeatureVector,
    k: usize,
) -> Result<Vec<RankedResult<'a>>, MatchError> {
    if k == 0 {
        return Err(MatchError::InvalidArgument(
            "k must be a positive integer, got 0".to_string(),
        ));
    }
    if catalog.is_empty() {
        return Err(MatchError::EmptyCatalog);
    }
    query.ensure_finite()?;

    let mut ranked: Vec<RankedResult<'a>> = catalog
        .iter()
        .map(|entry| RankedResult {
            entry,
            distance: distance(query, &entry.features),
        })
        .collect();

    // sort_by is stable; ties stay in catalog order
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked.truncate(k);

    Ok(ranked)
}

/// Parse text tokens into a query and rank the catalog against it
pub fn recommend_tokens<'a, S: AsRef<str>>(
    catalog: &'a [CatalogEntry],
    tokens: &[S],
    k: usize,
) -> Result<Vec<RankedResult<'a>>, MatchError> {
    let query = FeatureVector::parse_tokens(tokens)?;
    recommend(catalog, &query, k)
}
