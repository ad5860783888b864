//! External content providers
//!
//! Each third-party service sits behind a small trait so the panels and the
//! orchestrator can run against fakes:
//! - Mapbox: place search for the autocomplete feed
//! - OpenWeather: current conditions by city name
//! - TheMealDB: dishes by area
//! - Deezer (through RapidAPI): track search
//! - REST Countries: country facts by name
//! - Unsplash: scenic photos

use async_trait::async_trait;

use crate::Result;
use crate::models::{
    CountryFacts, DishSummary, PlaceCandidate, ScenicImage, TrackSummary, WeatherSnapshot,
};

pub mod deezer;
pub mod mapbox;
pub mod mealdb;
pub mod openweather;
pub mod restcountries;
pub mod unsplash;

pub use deezer::DeezerClient;
pub use mapbox::MapboxClient;
pub use mealdb::MealDbClient;
pub use openweather::OpenWeatherClient;
pub use restcountries::RestCountriesClient;
pub use unsplash::UnsplashClient;

#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Ranked candidates for free text, provider order preserved
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<PlaceCandidate>>;
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot>;
}

#[async_trait]
pub trait DishSource: Send + Sync {
    async fn dishes(&self, country: &str) -> Result<Vec<DishSummary>>;
}

#[async_trait]
pub trait TrackSource: Send + Sync {
    async fn tracks(&self, query: &str) -> Result<Vec<TrackSummary>>;
}

#[async_trait]
pub trait CountrySource: Send + Sync {
    async fn countries(&self, name: &str) -> Result<Vec<CountryFacts>>;
}

/// Shape filter for photo searches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Any,
    Landscape,
}

/// Photo search, used for scenic photos and traditional dress photos
#[async_trait]
pub trait ScenerySource: Send + Sync {
    async fn photos(&self, query: &str, orientation: Orientation) -> Result<Vec<ScenicImage>>;
}

/// Join a configured base URL and a path without doubling slashes
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
