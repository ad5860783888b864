//! Data models for the CityVibe aggregator
//!
//! All values are transient and read-only after construction:
//! - Place: autocomplete candidates and the tokens derived from them
//! - Weather: current conditions for a city
//! - Content: dish, track, country facts and scenic image summaries
//! - Ambient: colors sampled from images and the background overlay

pub mod ambient;
pub mod content;
pub mod place;
pub mod weather;

// Re-export all public types for convenient access
pub use ambient::{AmbientColor, Overlay};
pub use content::{CountryFacts, DishSummary, ScenicImage, TrackSummary};
pub use place::PlaceCandidate;
pub use weather::WeatherSnapshot;
