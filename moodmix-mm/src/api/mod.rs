//! HTTP API handlers for moodmix-mm

pub mod catalog;
pub mod health;
pub mod moods;
pub mod recommend;

pub use catalog::{catalog_summary, get_song, list_songs};
pub use health::health_routes;
pub use moods::list_moods;
pub use recommend::{recommend_by_body, recommend_by_query};
