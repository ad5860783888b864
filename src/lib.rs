//! `CityVibe` - the feel of a place on one page
//!
//! Pick a place from the autocomplete feed and every panel (weather, a famous
//! dish, a traditional track, country facts and a scenic photo) is fetched
//! concurrently from its own provider. The scenic photo also tints the page
//! background with an ambient color.

pub mod ambient;
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod panels;
pub mod playback;
pub mod providers;
pub mod ui;
pub mod web;

// Re-export core types for public API
pub use ambient::ColorExtractor;
pub use app::CityVibe;
pub use config::VibeConfig;
pub use error::{ErrorKind, VibeError};
pub use feed::{SuggestionFeed, Suggestions};
pub use models::{AmbientColor, Overlay, PlaceCandidate};
pub use orchestrator::{Aggregator, FanOut, PanelOutcome, VibeReport};
pub use panels::{PanelFragment, PanelKind};
pub use playback::{PlaybackId, PreviewDeck};
pub use ui::{PanelView, UiState, UiStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, VibeError>;
