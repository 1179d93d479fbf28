//! Queries against the `songs` table

use crate::db::models::{NewSong, SongRow};
use crate::{uuid_utils, Error, Result};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

const SELECT_SONG_COLUMNS: &str = "SELECT guid, catalog_order, title, artist, link, \
     danceability, energy, speechiness, acousticness, valence, tempo, created_at \
     FROM songs";

/// Validate a song before it reaches the database
pub fn validate_new_song(song: &NewSong) -> Result<()> {
    match song_problem(song) {
        Some(problem) => Err(Error::InvalidInput(problem)),
        None => Ok(()),
    }
}

fn song_problem(song: &NewSong) -> Option<String> {
    if song.title.trim().is_empty() {
        return Some("song title is empty".to_string());
    }
    song.features
        .ensure_normalized()
        .err()
        .map(|e| format!("'{}': {}", song.title.trim(), e))
}

/// Append songs after the current last entry, in slice order
///
/// All songs are validated first; nothing is written if any is invalid.
/// Returns the assigned guids in the same order.
pub async fn insert_songs(pool: &SqlitePool, songs: &[NewSong]) -> Result<Vec<String>> {
    check_songs(songs)?;

    let mut tx = pool.begin().await?;
    let guids = append_songs(&mut *tx, songs).await?;
    tx.commit().await?;
    info!("Inserted {} songs", guids.len());

    Ok(guids)
}

/// Swap the whole catalog for `songs` in one transaction
///
/// Returns the number of songs removed and the new guids. On any failure
/// the previous catalog is left as it was.
pub async fn replace_songs(pool: &SqlitePool, songs: &[NewSong]) -> Result<(u64, Vec<String>)> {
    check_songs(songs)?;

    let mut tx = pool.begin().await?;
    let removed = sqlx::query("DELETE FROM songs")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let guids = append_songs(&mut *tx, songs).await?;
    tx.commit().await?;
    info!("Replaced {} songs with {}", removed, guids.len());

    Ok((removed, guids))
}

fn check_songs(songs: &[NewSong]) -> Result<()> {
    for (index, song) in songs.iter().enumerate() {
        if let Some(problem) = song_problem(song) {
            return Err(Error::InvalidInput(format!("entry {}: {}", index, problem)));
        }
    }
    Ok(())
}

async fn append_songs(conn: &mut SqliteConnection, songs: &[NewSong]) -> Result<Vec<String>> {
    let last_order: Option<i64> = sqlx::query_scalar("SELECT MAX(catalog_order) FROM songs")
        .fetch_one(&mut *conn)
        .await?;
    let mut next_order = last_order.map_or(0, |order| order + 1);

    let mut guids = Vec::with_capacity(songs.len());
    for song in songs {
        let guid = uuid_utils::generate();
        let f = &song.features;
        sqlx::query(
            r#"
            INSERT INTO songs (
                guid, catalog_order, title, artist, link,
                danceability, energy, speechiness, acousticness, valence, tempo
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&guid)
        .bind(next_order)
        .bind(song.title.trim())
        .bind(song.artist.trim())
        .bind(song.link.trim())
        .bind(f.danceability)
        .bind(f.energy)
        .bind(f.speechiness)
        .bind(f.acousticness)
        .bind(f.valence)
        .bind(f.tempo)
        .execute(&mut *conn)
        .await?;

        guids.push(guid);
        next_order += 1;
    }

    Ok(guids)
}

/// All songs in catalog order
pub async fn list_songs(pool: &SqlitePool) -> Result<Vec<SongRow>> {
    let sql = format!("{} ORDER BY catalog_order ASC", SELECT_SONG_COLUMNS);
    let rows = sqlx::query_as::<_, SongRow>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn get_song(pool: &SqlitePool, guid: &str) -> Result<SongRow> {
    let sql = format!("{} WHERE guid = ?", SELECT_SONG_COLUMNS);
    sqlx::query_as::<_, SongRow>(&sql)
        .bind(guid)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("song {}", guid)))
}

pub async fn count_songs(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
