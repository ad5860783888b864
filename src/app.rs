//! Application wiring
//!
//! Builds the shared HTTP client, the UI store, the suggestion feed, the
//! preview deck and the aggregator from one configuration.

use std::sync::Arc;

use tracing::info;

use crate::Result;
use crate::config::VibeConfig;
use crate::feed::SuggestionFeed;
use crate::http::ApiClient;
use crate::orchestrator::Aggregator;
use crate::playback::{PreviewDeck, SpoolOutput};
use crate::providers::MapboxClient;
use crate::ui::UiStore;

pub struct CityVibe {
    pub config: VibeConfig,
    pub ui: UiStore,
    pub feed: SuggestionFeed,
    pub aggregator: Aggregator,
}

impl CityVibe {
    pub fn from_config(config: VibeConfig) -> Result<Self> {
        let http = ApiClient::new(&config.http)?;
        let ui = UiStore::new();

        let feed = SuggestionFeed::new(
            Arc::new(MapboxClient::new(&config, http.clone())?),
            config.feed.max_suggestions,
            ui.clone(),
        );
        let deck = Arc::new(PreviewDeck::new(Arc::new(SpoolOutput::from_config(
            &config,
            http.clone(),
        ))));
        let aggregator = Aggregator::from_config(&config, http, ui.clone(), deck)?;

        info!(
            "CityVibe ready with panels {:?}",
            aggregator.panel_kinds()
        );
        Ok(Self {
            config,
            ui,
            feed,
            aggregator,
        })
    }
}
