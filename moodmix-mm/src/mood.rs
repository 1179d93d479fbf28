//! Self-reported mood → feature vector presets
//!
//! The mapping table is visible here rather than hidden in data files.
//! Values are rough targets, not measurements: they only need to land the
//! query in the right region of the feature space.

use moodmix_common::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown mood '{0}'")]
pub struct UnknownMood(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Energetic,
    Calm,
    Focused,
    Romantic,
    Angry,
    Party,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Energetic,
        Mood::Calm,
        Mood::Focused,
        Mood::Romantic,
        Mood::Angry,
        Mood::Party,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Energetic => "energetic",
            Mood::Calm => "calm",
            Mood::Focused => "focused",
            Mood::Romantic => "romantic",
            Mood::Angry => "angry",
            Mood::Party => "party",
        }
    }

    /// Target features: danceability, energy, speechiness, acousticness, valence, tempo
    pub fn features(self) -> FeatureVector {
        match self {
            Mood::Happy => FeatureVector::new(0.75, 0.70, 0.10, 0.25, 0.85, 0.60),
            Mood::Sad => FeatureVector::new(0.35, 0.25, 0.05, 0.70, 0.15, 0.35),
            Mood::Energetic => FeatureVector::new(0.70, 0.90, 0.10, 0.10, 0.65, 0.80),
            Mood::Calm => FeatureVector::new(0.40, 0.20, 0.05, 0.80, 0.50, 0.30),
            Mood::Focused => FeatureVector::new(0.45, 0.40, 0.03, 0.60, 0.40, 0.45),
            Mood::Romantic => FeatureVector::new(0.55, 0.35, 0.05, 0.55, 0.60, 0.40),
            Mood::Angry => FeatureVector::new(0.45, 0.95, 0.15, 0.05, 0.20, 0.75),
            Mood::Party => FeatureVector::new(0.90, 0.85, 0.15, 0.10, 0.80, 0.70),
        }
    }
}

impl FromStr for Mood {
    type Err = UnknownMood;

    /// Case-insensitive; accepts a few common synonyms
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        let mood = match name.as_str() {
            "happy" | "joyful" | "cheerful" => Mood::Happy,
            "sad" | "melancholy" | "down" => Mood::Sad,
            "energetic" | "hyped" | "pumped" => Mood::Energetic,
            "calm" | "relaxed" | "chill" => Mood::Calm,
            "focused" | "focus" | "study" => Mood::Focused,
            "romantic" | "love" => Mood::Romantic,
            "angry" | "frustrated" => Mood::Angry,
            "party" | "celebrate" => Mood::Party,
            _ => return Err(UnknownMood(s.trim().to_string())),
        };
        Ok(mood)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_normalized() {
        for mood in Mood::ALL {
            assert!(
                mood.features().ensure_normalized().is_ok(),
                "{} preset out of range",
                mood
            );
        }
    }

    #[test]
    fn test_presets_are_distinct() {
        for (i, a) in Mood::ALL.iter().enumerate() {
            for b in &Mood::ALL[i + 1..] {
                assert_ne!(a.features(), b.features(), "{} and {} collide", a, b);
            }
        }
    }

    #[test]
    fn test_parse_names_round_trip() {
        for mood in Mood::ALL {
            assert_eq!(mood.name().parse::<Mood>().unwrap(), mood);
        }
    }

    #[test]
    fn test_parse_case_and_whitespace() {
        assert_eq!(" HAPPY ".parse::<Mood>().unwrap(), Mood::Happy);
        assert_eq!("Chill".parse::<Mood>().unwrap(), Mood::Calm);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "sleepy".parse::<Mood>().unwrap_err();
        assert_eq!(err, UnknownMood("sleepy".to_string()));
        assert_eq!(err.to_string(), "Unknown mood 'sleepy'");
    }

    #[test]
    fn test_happy_is_brighter_than_sad() {
        assert!(Mood::Happy.features().valence > Mood::Sad.features().valence);
        assert!(Mood::Energetic.features().energy > Mood::Calm.features().energy);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_value(Mood::Party).unwrap(), "party");
        let mood: Mood = serde_json::from_str("\"focused\"").unwrap();
        assert_eq!(mood, Mood::Focused);
    }
}
