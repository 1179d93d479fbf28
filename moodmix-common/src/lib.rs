//! # moodmix Common Library
//!
//! Shared code for moodmix modules including:
//! - Feature vector and catalog record types
//! - Database initialization and models
//! - Configuration loading
//! - Error types

pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod uuid_utils;

pub use error::{Error, Result};
pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
