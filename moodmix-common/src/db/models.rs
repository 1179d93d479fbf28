//! Database models

use crate::FeatureVector;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of the `songs` table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SongRow {
    pub guid: String,
    pub catalog_order: i64,
    pub title: String,
    pub artist: String,
    pub link: String,
    pub danceability: f64,
    pub energy: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub valence: f64,
    pub tempo: f64,
    pub created_at: NaiveDateTime,
}

impl SongRow {
    pub fn features(&self) -> FeatureVector {
        FeatureVector {
            danceability: self.danceability,
            energy: self.energy,
            speechiness: self.speechiness,
            acousticness: self.acousticness,
            valence: self.valence,
            tempo: self.tempo,
        }
    }
}

/// Song awaiting insertion (guid and order are assigned on insert)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub link: String,
    #[serde(flatten)]
    pub features: FeatureVector,
}
