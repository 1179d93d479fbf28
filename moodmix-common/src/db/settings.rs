//! Runtime settings stored in the `settings` table

use crate::{Error, Result};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::warn;

/// Key for the number of recommendations returned when a request omits `k`
pub const DEFAULT_RESULT_COUNT_KEY: &str = "default_result_count";

/// Read and parse a setting; `Ok(None)` if missing or NULL
pub async fn get_setting<T: FromStr>(pool: &SqlitePool, key: &str) -> Result<Option<T>> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;

    match value.flatten() {
        Some(text) => text
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("Setting '{}' has invalid value '{}'", key, text))),
        None => Ok(None),
    }
}

/// Insert or replace a setting
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Number of recommendations to return when the caller does not say
///
/// Falls back to the compiled default when the setting is missing, invalid,
/// or zero.
pub async fn load_default_result_count(pool: &SqlitePool) -> Result<usize> {
    let fallback: usize = crate::db::init::DEFAULT_RESULT_COUNT
        .parse()
        .map_err(|_| Error::Internal("Invalid compiled default result count".to_string()))?;

    match get_setting::<usize>(pool, DEFAULT_RESULT_COUNT_KEY).await {
        Ok(Some(count)) if count > 0 => Ok(count),
        Ok(Some(_)) => {
            warn!("{} must be positive, using {}", DEFAULT_RESULT_COUNT_KEY, fallback);
            Ok(fallback)
        }
        Ok(None) => Ok(fallback),
        Err(Error::Config(msg)) => {
            warn!("{} (using {})", msg, fallback);
            Ok(fallback)
        }
        Err(e) => Err(e),
    }
}
