//! UUID utilities for song identifiers

use uuid::Uuid;

/// Generate a new song guid (UUIDv4, hyphenated text form)
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}
