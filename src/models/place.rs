//! Place candidate model produced by the geocoding service

use serde::{Deserialize, Serialize};

/// One autocomplete suggestion
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlaceCandidate {
    /// Full text shown in the suggestion list, e.g. "Paris, Île-de-France, France"
    pub display_name: String,
    /// The place itself, used as the city token
    pub primary_token: String,
    /// Broader region (usually the country), used as the region token
    pub context_token: String,
}

impl PlaceCandidate {
    #[must_use]
    pub fn new<D, P, C>(display_name: D, primary_token: P, context_token: C) -> Self
    where
        D: Into<String>,
        P: Into<String>,
        C: Into<String>,
    {
        Self {
            display_name: display_name.into(),
            primary_token: primary_token.into(),
            context_token: context_token.into(),
        }
    }

    /// Token handed to city-scoped panels (weather, scenery)
    #[must_use]
    pub fn city_token(&self) -> &str {
        &self.primary_token
    }

    /// Token handed to region-scoped panels (dish, music, country)
    #[must_use]
    pub fn region_token(&self) -> &str {
        &self.context_token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        let place = PlaceCandidate::new("Paris, France", "Paris", "France");
        assert_eq!(place.city_token(), "Paris");
        assert_eq!(place.region_token(), "France");
    }
}
