//! Summaries for the dish, music, country and scenery panels

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DishSummary {
    pub name: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TrackSummary {
    pub title: String,
    pub artist_name: String,
    /// Short playable preview (30s MP3 for the default provider)
    pub preview_url: String,
}

impl TrackSummary {
    /// Tracks without a preview cannot be played and are skipped
    #[must_use]
    pub fn is_playable(&self) -> bool {
        !self.preview_url.trim().is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CountryFacts {
    pub common_name: String,
    /// Capitals as listed by the provider; some countries have several, some none
    pub capitals: Vec<String>,
    pub population: u64,
}

impl CountryFacts {
    #[must_use]
    pub fn capital(&self) -> String {
        if self.capitals.is_empty() {
            "n/a".to_string()
        } else {
            self.capitals.join(", ")
        }
    }
}

/// A photo from the image search; scenic photos are the ambient color source
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ScenicImage {
    pub image_url: String,
    pub description: String,
    /// Dominant color hint from the provider, e.g. "#a3c2e0". Used for the
    /// ambient color when the image itself cannot be sampled.
    pub provider_color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capital_formatting() {
        let mut facts = CountryFacts {
            common_name: "South Africa".to_string(),
            capitals: vec![
                "Pretoria".to_string(),
                "Bloemfontein".to_string(),
                "Cape Town".to_string(),
            ],
            population: 59_308_690,
        };
        assert_eq!(facts.capital(), "Pretoria, Bloemfontein, Cape Town");

        facts.capitals.clear();
        assert_eq!(facts.capital(), "n/a");
    }
}
