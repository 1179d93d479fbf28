//! Mood preset listing

use axum::Json;
use moodmix_common::FeatureVector;
use serde::Serialize;

use crate::mood::Mood;

#[derive(Debug, Serialize)]
pub struct MoodPreset {
    pub mood: Mood,
    pub features: FeatureVector,
}

/// GET /api/moods
///
/// Every preset with the feature vector it stands for.
pub async fn list_moods() -> Json<Vec<MoodPreset>> {
    Json(
        Mood::ALL
            .into_iter()
            .map(|mood| MoodPreset {
                mood,
                features: mood.features(),
            })
            .collect(),
    )
}
