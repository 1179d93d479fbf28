//! Recommendation endpoints
//!
//! `GET /api/recommend?features=0.8,0.6,0.1,0.2,0.9,0.5&k=5`
//! `GET /api/recommend?mood=happy`
//! `POST /api/recommend` with `{"features": [...], "k": 5}` or `{"mood": "calm"}`
//!
//! Exactly one of `features` or `mood` must be given. `k` falls back to the
//! `default_result_count` setting.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use moodmix_common::FeatureVector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::matcher::{self, MatchError};
use crate::mood::Mood;
use crate::AppState;

/// Query parameters for GET; all text so every failure gets our JSON error body
#[derive(Debug, Deserialize)]
pub struct RecommendParams {
    /// Six comma-separated numbers
    pub features: Option<String>,
    pub mood: Option<String>,
    pub k: Option<String>,
}

/// A feature value given as a JSON number, as text, or as anything else
///
/// Anything else (null, arrays, objects) is kept so the query parser can
/// reject it with a positioned message.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FeatureToken {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl FeatureToken {
    fn into_text(self) -> String {
        match self {
            FeatureToken::Number(value) => value.to_string(),
            FeatureToken::Text(text) => text,
            FeatureToken::Other(value) => value.to_string(),
        }
    }
}

/// POST body
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub features: Option<Vec<FeatureToken>>,
    pub mood: Option<String>,
    /// Any JSON value; only integers are accepted
    pub k: Option<serde_json::Value>,
}

fn parse_k_value(value: &serde_json::Value) -> ApiResult<i64> {
    value
        .as_i64()
        .ok_or_else(|| ApiError::InvalidArgument(format!("k must be an integer, got {}", value)))
}

/// One ranked song
#[derive(Debug, Serialize)]
pub struct RecommendationRow {
    pub rank: usize,
    pub guid: String,
    pub title: String,
    pub artist: String,
    pub link: String,
    pub distance: f64,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    /// Vector actually matched against (the preset's, for mood requests)
    pub query: FeatureVector,
    pub mood: Option<Mood>,
    pub k: usize,
    pub catalog_size: usize,
    pub results: Vec<RecommendationRow>,
}

/// Where the query vector comes from
enum QuerySource {
    Tokens(Vec<String>),
    Mood(String),
}

impl QuerySource {
    fn pick(tokens: Option<Vec<String>>, mood: Option<String>) -> ApiResult<Self> {
        match (tokens, mood) {
            (Some(tokens), None) => Ok(QuerySource::Tokens(tokens)),
            (None, Some(mood)) => Ok(QuerySource::Mood(mood)),
            (Some(_), Some(_)) => Err(ApiError::InvalidArgument(
                "give either 'features' or 'mood', not both".to_string(),
            )),
            (None, None) => Err(ApiError::InvalidQuery(
                "missing 'features' or 'mood'".to_string(),
            )),
        }
    }

    fn resolve(self) -> ApiResult<(FeatureVector, Option<Mood>)> {
        match self {
            QuerySource::Tokens(tokens) => {
                let query = FeatureVector::parse_tokens(&tokens).map_err(MatchError::from)?;
                Ok((query, None))
            }
            QuerySource::Mood(name) => {
                let mood: Mood = name.parse()?;
                Ok((mood.features(), Some(mood)))
            }
        }
    }
}

fn split_feature_text(text: &str) -> Vec<String> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn result_count(state: &AppState, k: Option<i64>) -> ApiResult<usize> {
    match k {
        Some(k) => Ok(matcher::result_count(k)?),
        None => Ok(state.default_result_count),
    }
}

fn run(
    state: &AppState,
    source: QuerySource,
    k: Option<i64>,
) -> ApiResult<Json<RecommendResponse>> {
    let k = result_count(state, k)?;
    let (query, mood) = source.resolve()?;

    let ranked = matcher::recommend(state.catalog.entries(), &query, k)?;
    debug!("Recommended {} songs for {}", ranked.len(), query);

    let results = ranked
        .into_iter()
        .enumerate()
        .map(|(index, result)| RecommendationRow {
            rank: index + 1,
            guid: result.entry.guid.clone(),
            title: result.entry.title.clone(),
            artist: result.entry.artist.clone(),
            link: result.entry.link.clone(),
            distance: result.distance,
        })
        .collect();

    Ok(Json(RecommendResponse {
        query,
        mood,
        k,
        catalog_size: state.catalog.len(),
        results,
    }))
}

/// GET /api/recommend
pub async fn recommend_by_query(
    State(state): State<AppState>,
    params: Result<Query<RecommendParams>, QueryRejection>,
) -> ApiResult<Json<RecommendResponse>> {
    let Query(params) = params?;
    let k = match params.k.as_deref().map(str::trim) {
        Some(text) => Some(text.parse::<i64>().map_err(|_| {
            ApiError::InvalidArgument(format!("k must be an integer, got '{}'", text))
        })?),
        None => None,
    };
    let source = QuerySource::pick(
        params.features.as_deref().map(split_feature_text),
        params.mood,
    )?;

    run(&state, source, k)
}

/// POST /api/recommend
pub async fn recommend_by_body(
    State(state): State<AppState>,
    request: Result<Json<RecommendRequest>, JsonRejection>,
) -> ApiResult<Json<RecommendResponse>> {
    let Json(request) = request?;
    let k = request.k.as_ref().map(parse_k_value).transpose()?;
    let tokens = request
        .features
        .map(|values| values.into_iter().map(FeatureToken::into_text).collect());
    let source = QuerySource::pick(tokens, request.mood)?;

    run(&state, source, k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_feature_text() {
        assert_eq!(
            split_feature_text("0.1,0.2, 0.3 0.4,,0.5 ,0.6"),
            vec!["0.1", "0.2", "0.3", "0.4", "0.5", "0.6"]
        );
        assert!(split_feature_text("").is_empty());
    }

    #[test]
    fn test_feature_token_text_round_trips_numbers() {
        let tokens: Vec<FeatureToken> = serde_json::from_str(r#"[0.1, "0.25", 1]"#).unwrap();
        let text: Vec<String> = tokens.into_iter().map(FeatureToken::into_text).collect();
        assert_eq!(text, vec!["0.1", "0.25", "1"]);
    }

    #[test]
    fn test_feature_token_keeps_non_numeric_json() {
        let tokens: Vec<FeatureToken> = serde_json::from_str(r#"[null, [1]]"#).unwrap();
        let text: Vec<String> = tokens.into_iter().map(FeatureToken::into_text).collect();
        assert_eq!(text, vec!["null", "[1]"]);
    }

    #[test]
    fn test_parse_k_value() {
        assert_eq!(parse_k_value(&serde_json::json!(3)).unwrap(), 3);
        assert_eq!(parse_k_value(&serde_json::json!(-1)).unwrap(), -1);
        assert!(matches!(
            parse_k_value(&serde_json::json!("3")),
            Err(ApiError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_k_value(&serde_json::json!(2.5)),
            Err(ApiError::InvalidArgument(_))
        ));
    }
}
