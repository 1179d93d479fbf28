//! In-memory song catalog
//!
//! Loaded once from the `songs` table at startup and never mutated
//! afterwards. Clones share the same entries.

use chrono::{DateTime, Utc};
use moodmix_common::db::{self, NewSong, SongRow};
use moodmix_common::{Error, FeatureVector, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// One song with its features
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub guid: String,
    pub title: String,
    pub artist: String,
    pub link: String,
    pub features: FeatureVector,
}

impl From<SongRow> for CatalogEntry {
    fn from(row: SongRow) -> Self {
        let features = row.features();
        Self {
            guid: row.guid,
            title: row.title,
            artist: row.artist,
            link: row.link,
            features,
        }
    }
}

/// Read-only, ordered song collection
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Arc<[CatalogEntry]>,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries: entries.into(),
            loaded_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Load every song in catalog order
    pub async fn load(pool: &SqlitePool) -> Result<Self> {
        let rows = db::list_songs(pool).await?;
        let catalog = Self::new(rows.into_iter().map(CatalogEntry::from).collect());
        info!("Loaded catalog: {} songs", catalog.len());
        Ok(catalog)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, guid: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.guid == guid)
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Outcome of a catalog import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub removed: u64,
    pub total: i64,
}

/// Parse the JSON import format: an array of song objects
///
/// ```json
/// [{"title": "...", "artist": "...", "link": "...",
///   "danceability": 0.8, "energy": 0.6, "speechiness": 0.05,
///   "acousticness": 0.1, "valence": 0.9, "tempo": 0.55}]
/// ```
pub fn parse_catalog_json(content: &str) -> Result<Vec<NewSong>> {
    let songs: Vec<NewSong> = serde_json::from_str(content)?;
    for (index, song) in songs.iter().enumerate() {
        db::validate_new_song(song).map_err(|e| match e {
            Error::InvalidInput(msg) => Error::InvalidInput(format!("entry {}: {}", index, msg)),
            other => other,
        })?;
    }
    Ok(songs)
}

/// Import songs from a JSON file, appending to (or replacing) the catalog
///
/// The whole file is validated before anything is written, and a replace
/// deletes and inserts within one transaction.
pub async fn import_json(pool: &SqlitePool, path: &Path, replace: bool) -> Result<ImportSummary> {
    let content = std::fs::read_to_string(path)?;
    let songs = parse_catalog_json(&content)?;
    info!("Parsed {} songs from {}", songs.len(), path.display());

    let (removed, guids) = if replace {
        db::replace_songs(pool, &songs).await?
    } else {
        (0, db::insert_songs(pool, &songs).await?)
    };
    let total = db::count_songs(pool).await?;

    Ok(ImportSummary {
        imported: guids.len(),
        removed,
        total,
    })
}
