//! Song feature vectors
//!
//! Every song in the catalog, and every mood query, is described by the same
//! six normalized audio features. The canonical ordering is:
//!
//! | index | feature      |
//! |-------|--------------|
//! | 0     | danceability |
//! | 1     | energy       |
//! | 2     | speechiness  |
//! | 3     | acousticness |
//! | 4     | valence      |
//! | 5     | tempo        |
//!
//! Only [`FeatureVector::to_array`] and [`FeatureVector::from_array`] know
//! about that ordering; everything else goes through named fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of features in a [`FeatureVector`]
pub const FEATURE_COUNT: usize = 6;

/// Feature names in canonical order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "danceability",
    "energy",
    "speechiness",
    "acousticness",
    "valence",
    "tempo",
];

/// Errors raised while building a [`FeatureVector`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("expected {expected} feature values, got {actual}")]
    WrongArity { expected: usize, actual: usize },

    #[error("feature {position} ('{token}') is not a number")]
    NotNumeric { position: usize, token: String },

    #[error("feature '{name}' is not finite ({value})")]
    NotFinite { name: &'static str, value: f64 },

    #[error("feature '{name}' = {value} is outside [0, 1]")]
    OutOfRange { name: &'static str, value: f64 },
}

/// Six-dimensional normalized audio descriptor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub danceability: f64,
    pub energy: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub valence: f64,
    pub tempo: f64,
}

impl FeatureVector {
    pub const fn new(
        danceability: f64,
        energy: f64,
        speechiness: f64,
        acousticness: f64,
        valence: f64,
        tempo: f64,
    ) -> Self {
        Self {
            danceability,
            energy,
            speechiness,
            acousticness,
            valence,
            tempo,
        }
    }

    /// Same value in every dimension
    pub const fn splat(value: f64) -> Self {
        Self::new(value, value, value, value, value, value)
    }

    /// Values in canonical order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.danceability,
            self.energy,
            self.speechiness,
            self.acousticness,
            self.valence,
            self.tempo,
        ]
    }

    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        let [danceability, energy, speechiness, acousticness, valence, tempo] = values;
        Self::new(danceability, energy, speechiness, acousticness, valence, tempo)
    }

    /// Build from a slice, enforcing arity and finiteness
    pub fn from_slice(values: &[f64]) -> Result<Self, FeatureError> {
        let array: [f64; FEATURE_COUNT] =
            values.try_into().map_err(|_| FeatureError::WrongArity {
                expected: FEATURE_COUNT,
                actual: values.len(),
            })?;
        let vector = Self::from_array(array);
        vector.ensure_finite()?;
        Ok(vector)
    }

    /// Parse text tokens (one per feature) into a vector
    ///
    /// Arity is checked before any token is parsed, so `["x"]` reports
    /// `WrongArity` rather than `NotNumeric`.
    pub fn parse_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, FeatureError> {
        if tokens.len() != FEATURE_COUNT {
            return Err(FeatureError::WrongArity {
                expected: FEATURE_COUNT,
                actual: tokens.len(),
            });
        }

        let mut values = [0.0; FEATURE_COUNT];
        for (position, (slot, token)) in values.iter_mut().zip(tokens).enumerate() {
            let token = token.as_ref().trim();
            *slot = token.parse::<f64>().map_err(|_| FeatureError::NotNumeric {
                position,
                token: token.to_string(),
            })?;
        }

        Self::from_slice(&values)
    }

    /// `(name, value)` pairs in canonical order
    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.to_array())
    }

    /// Reject NaN and infinities
    pub fn ensure_finite(&self) -> Result<(), FeatureError> {
        match self.named_values().find(|(_, value)| !value.is_finite()) {
            Some((name, value)) => Err(FeatureError::NotFinite { name, value }),
            None => Ok(()),
        }
    }

    /// Require every component to be finite and within [0, 1]
    ///
    /// Catalog entries must satisfy this; queries only need to be finite.
    pub fn ensure_normalized(&self) -> Result<(), FeatureError> {
        self.ensure_finite()?;
        match self
            .named_values()
            .find(|(_, value)| !(0.0..=1.0).contains(value))
        {
            Some((name, value)) => Err(FeatureError::OutOfRange { name, value }),
            None => Ok(()),
        }
    }
}

impl FromStr for FeatureVector {
    type Err = FeatureError;

    /// Accepts comma- and/or whitespace-separated values: `"0.1, 0.2 0.3,0.4,0.5,0.6"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .collect();
        Self::parse_tokens(&tokens)
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [d, e, s, a, v, t] = self.to_array();
        write!(f, "[{d:.3}, {e:.3}, {s:.3}, {a:.3}, {v:.3}, {t:.3}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_order_matches_names() {
        let v = FeatureVector::new(0.1, 0.2, 0.3, 0.4, 0.5, 0.6);
        assert_eq!(v.to_array(), [0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);

        let named: Vec<_> = v.named_values().collect();
        assert_eq!(named[0], ("danceability", 0.1));
        assert_eq!(named[5], ("tempo", 0.6));
    }

    #[test]
    fn test_parse_tokens_ok() {
        let v = FeatureVector::parse_tokens(&["0.5", " 0.25", "0", "1", "0.75 ", "0.1"]).unwrap();
        assert_eq!(v.energy, 0.25);
        assert_eq!(v.acousticness, 1.0);
        assert_eq!(v.tempo, 0.1);
    }

    #[test]
    fn test_parse_tokens_too_few() {
        let err = FeatureVector::parse_tokens(&["0.1", "0.2", "0.3"]).unwrap_err();
        assert_eq!(err, FeatureError::WrongArity { expected: 6, actual: 3 });
    }

    #[test]
    fn test_parse_tokens_too_many() {
        let tokens = ["0"; 7];
        let err = FeatureVector::parse_tokens(&tokens).unwrap_err();
        assert_eq!(err, FeatureError::WrongArity { expected: 6, actual: 7 });
    }

    #[test]
    fn test_parse_tokens_not_numeric() {
        let err = FeatureVector::parse_tokens(&["0.1", "loud", "0", "0", "0", "0"]).unwrap_err();
        assert_eq!(
            err,
            FeatureError::NotNumeric {
                position: 1,
                token: "loud".to_string()
            }
        );
    }

    #[test]
    fn test_parse_tokens_rejects_nan_and_inf() {
        // f64::from_str accepts these spellings, so they must be caught afterwards
        let err = FeatureVector::parse_tokens(&["NaN", "0", "0", "0", "0", "0"]).unwrap_err();
        assert!(matches!(err, FeatureError::NotFinite { name: "danceability", .. }));

        let err = FeatureVector::parse_tokens(&["0", "0", "0", "0", "0", "inf"]).unwrap_err();
        assert!(matches!(err, FeatureError::NotFinite { name: "tempo", .. }));
    }

    #[test]
    fn test_from_str_mixed_separators() {
        let v: FeatureVector = "0.1, 0.2 0.3,0.4,\t0.5 , 0.6".parse().unwrap();
        assert_eq!(v, FeatureVector::new(0.1, 0.2, 0.3, 0.4, 0.5, 0.6));
    }

    #[test]
    fn test_from_str_empty() {
        let err = "".parse::<FeatureVector>().unwrap_err();
        assert_eq!(err, FeatureError::WrongArity { expected: 6, actual: 0 });
    }

    #[test]
    fn test_from_slice_wrong_length() {
        let err = FeatureVector::from_slice(&[0.0; 5]).unwrap_err();
        assert_eq!(err, FeatureError::WrongArity { expected: 6, actual: 5 });
    }

    #[test]
    fn test_ensure_normalized() {
        assert!(FeatureVector::splat(0.0).ensure_normalized().is_ok());
        assert!(FeatureVector::splat(1.0).ensure_normalized().is_ok());

        let v = FeatureVector::new(0.5, 0.5, 0.5, 0.5, 1.2, 0.5);
        assert_eq!(
            v.ensure_normalized().unwrap_err(),
            FeatureError::OutOfRange { name: "valence", value: 1.2 }
        );
    }

    #[test]
    fn test_serde_uses_field_names() {
        let v = FeatureVector::new(0.1, 0.2, 0.3, 0.4, 0.5, 0.6);
        let json = serde_json::to_value(v).unwrap();
        assert_eq!(json["speechiness"], 0.3);
        assert_eq!(json["tempo"], 0.6);
    }
}
