//! Aggregation orchestrator
//!
//! A place selection fans out to every panel at once. Each panel runs as its
//! own task with its own result channel; nothing waits for anything else and
//! a failing panel only fails itself. Results are also applied to the UI
//! store as they arrive, tagged with the selection's generation.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{Instrument, info, info_span, warn};

use crate::ambient::ColorExtractor;
use crate::config::VibeConfig;
use crate::error::ErrorKind;
use crate::http::ApiClient;
use crate::models::{Overlay, PlaceCandidate};
use crate::panels::{
    CountryPanel, DishPanel, DressPanel, MusicPanel, PanelFragment, PanelKind, SceneryPanel,
    WeatherPanel,
};
use crate::playback::PreviewDeck;
use crate::providers::{
    DeezerClient, MealDbClient, OpenWeatherClient, RestCountriesClient, UnsplashClient,
};
use crate::ui::{PanelView, UiStore};
use crate::{Result, VibeError};

/// What a panel task hands back. Only scenery carries a background.
struct Rendered {
    fragment: PanelFragment,
    background: Option<Overlay>,
}

impl From<PanelFragment> for Rendered {
    fn from(fragment: PanelFragment) -> Self {
        Self {
            fragment,
            background: None,
        }
    }
}

/// One tracked panel task
pub struct PanelTask {
    pub kind: PanelKind,
    pub token: String,
    generation: u64,
    ui: Option<UiStore>,
    handle: JoinHandle<Result<Rendered>>,
}

impl PanelTask {
    pub async fn outcome(self) -> PanelOutcome {
        let (result, background) = match self.handle.await {
            Ok(Ok(rendered)) => (Ok(rendered.fragment), rendered.background),
            Ok(Err(e)) => (Err(e), None),
            Err(e) => {
                let cancelled = Err(VibeError::Cancelled {
                    message: e.to_string(),
                });
                if let Some(ui) = &self.ui {
                    ui.apply_panel(self.generation, self.kind, &cancelled);
                }
                (cancelled, None)
            }
        };
        PanelOutcome {
            kind: self.kind,
            token: self.token,
            result,
            background,
        }
    }

    /// Stop the task and settle its panel as cancelled. A panel that already
    /// settled keeps its content.
    pub fn abort(&self) {
        self.handle.abort();
        if let Some(ui) = &self.ui {
            let cancelled = Err(VibeError::Cancelled {
                message: "aborted".to_string(),
            });
            ui.apply_panel(self.generation, self.kind, &cancelled);
        }
    }
}

#[derive(Debug)]
pub struct PanelOutcome {
    pub kind: PanelKind,
    pub token: String,
    pub result: Result<PanelFragment>,
    /// Ambient overlay sampled by this panel, if any
    pub background: Option<Overlay>,
}

/// Every panel task started for one selection
pub struct FanOut {
    /// Page generation, or 0 for a detached lookup
    pub generation: u64,
    pub place: PlaceCandidate,
    tasks: Vec<PanelTask>,
}

impl FanOut {
    /// Panel kinds and the token each was given
    pub fn calls(&self) -> Vec<(PanelKind, String)> {
        self.tasks
            .iter()
            .map(|task| (task.kind, task.token.clone()))
            .collect()
    }

    /// Take a single panel's task to await it on its own
    pub fn take(&mut self, kind: PanelKind) -> Option<PanelTask> {
        let position = self.tasks.iter().position(|task| task.kind == kind)?;
        Some(self.tasks.remove(position))
    }

    /// Outcomes in completion order
    pub fn completions(self) -> impl Stream<Item = PanelOutcome> {
        self.tasks
            .into_iter()
            .map(PanelTask::outcome)
            .collect::<FuturesUnordered<_>>()
    }

    pub fn abort(&self) {
        for task in &self.tasks {
            task.abort();
        }
    }

    /// Wait for every panel and collect a report
    pub async fn join(self) -> VibeReport {
        let generation = self.generation;
        let place = self.place.clone();

        let outcomes: Vec<PanelOutcome> = self.completions().collect().await;
        let background = outcomes.iter().find_map(|outcome| outcome.background);
        let mut panels: Vec<PanelReport> = outcomes.into_iter().map(PanelReport::from).collect();
        panels.sort_by_key(|panel| panel.kind);

        VibeReport {
            place,
            generation,
            fetched_at: Utc::now(),
            panels,
            background,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelError {
    pub kind: ErrorKind,
    pub message: String,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelReport {
    pub kind: PanelKind,
    pub token: String,
    pub html: Option<String>,
    pub error: Option<PanelError>,
}

impl From<PanelOutcome> for PanelReport {
    fn from(outcome: PanelOutcome) -> Self {
        let (html, error) = match outcome.result {
            Ok(fragment) => (Some(fragment.html), None),
            Err(e) => (
                None,
                Some(PanelError {
                    kind: e.kind(),
                    message: e.user_message(),
                    detail: e.to_string(),
                }),
            ),
        };
        Self {
            kind: outcome.kind,
            token: outcome.token,
            html,
            error,
        }
    }
}

/// Joined result of one selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VibeReport {
    pub place: PlaceCandidate,
    pub generation: u64,
    pub fetched_at: DateTime<Utc>,
    pub panels: Vec<PanelReport>,
    pub background: Option<Overlay>,
}

impl VibeReport {
    pub fn panel(&self, kind: PanelKind) -> Option<&PanelReport> {
        self.panels.iter().find(|panel| panel.kind == kind)
    }
}

pub struct Aggregator {
    weather: WeatherPanel,
    dish: DishPanel,
    music: MusicPanel,
    country: CountryPanel,
    dress: Option<DressPanel>,
    scenery: Option<SceneryPanel>,
    ambient_opacity: f32,
    ui: UiStore,
}

impl Aggregator {
    pub fn new(
        weather: WeatherPanel,
        dish: DishPanel,
        music: MusicPanel,
        country: CountryPanel,
        ui: UiStore,
    ) -> Self {
        Self {
            weather,
            dish,
            music,
            country,
            dress: None,
            scenery: None,
            ambient_opacity: 0.3,
            ui,
        }
    }

    /// Add the scenery panel, which also drives the ambient background
    #[must_use]
    pub fn with_scenery(mut self, scenery: SceneryPanel, opacity: f32) -> Self {
        self.scenery = Some(scenery);
        self.ambient_opacity = opacity;
        self
    }

    #[must_use]
    pub fn with_dress(mut self, dress: DressPanel) -> Self {
        self.dress = Some(dress);
        self
    }

    /// Wire the real providers. Scenery and dress need an Unsplash key.
    pub fn from_config(
        config: &VibeConfig,
        http: ApiClient,
        ui: UiStore,
        deck: Arc<PreviewDeck>,
    ) -> Result<Self> {
        let weather = WeatherPanel::new(Arc::new(OpenWeatherClient::new(config, http.clone())?));
        let dish = DishPanel::new(Arc::new(MealDbClient::new(config, http.clone())));
        let music = MusicPanel::new(
            Arc::new(DeezerClient::new(config, http.clone())?),
            config.music.qualifier.clone(),
            deck,
        );
        let country = CountryPanel::new(
            Arc::new(RestCountriesClient::new(config, http.clone())),
            config.matching.strict,
        );

        let aggregator = Self::new(weather, dish, music, country, ui);
        if config.credentials.unsplash_key.is_some() {
            let photos = Arc::new(UnsplashClient::new(config, http.clone())?);
            let scenery = SceneryPanel::new(photos.clone(), ColorExtractor::new(http));
            Ok(aggregator
                .with_dress(DressPanel::new(photos))
                .with_scenery(scenery, config.ambient.opacity))
        } else {
            info!("No unsplash_key configured, photo panels and ambient color disabled");
            Ok(aggregator)
        }
    }

    pub fn ui(&self) -> &UiStore {
        &self.ui
    }

    pub fn music(&self) -> &MusicPanel {
        &self.music
    }

    pub fn panel_kinds(&self) -> Vec<PanelKind> {
        let mut kinds = vec![
            PanelKind::Weather,
            PanelKind::Dish,
            PanelKind::Music,
            PanelKind::Country,
        ];
        if self.dress.is_some() {
            kinds.push(PanelKind::Dress);
        }
        if self.scenery.is_some() {
            kinds.push(PanelKind::Scenery);
        }
        kinds
    }

    /// Start every panel for a selected place and return without waiting
    pub fn on_place_selected(&self, candidate: &PlaceCandidate) -> FanOut {
        let generation = self.ui.begin_selection(candidate.clone(), &self.panel_kinds());
        info!(
            "Selection {}: '{}' (city '{}', region '{}')",
            generation,
            candidate.display_name,
            candidate.city_token(),
            candidate.region_token()
        );
        self.fan_out(candidate, generation, Some(&self.ui))
    }

    /// Run every panel for a place without touching the page state
    pub fn lookup(&self, candidate: &PlaceCandidate) -> FanOut {
        info!("Lookup '{}'", candidate.display_name);
        self.fan_out(candidate, 0, None)
    }

    fn fan_out(&self, candidate: &PlaceCandidate, generation: u64, ui: Option<&UiStore>) -> FanOut {
        let city = candidate.city_token();
        let region = candidate.region_token();
        let mut tasks = Vec::with_capacity(6);

        let weather = self.weather.clone();
        tasks.push(spawn(ui, generation, PanelKind::Weather, city, |token| async move {
            weather.render(&token).await.map(Rendered::from)
        }));

        let dish = self.dish.clone();
        tasks.push(spawn(ui, generation, PanelKind::Dish, region, |token| async move {
            dish.render(&token).await.map(Rendered::from)
        }));

        let music = self.music.clone();
        tasks.push(spawn(ui, generation, PanelKind::Music, region, |token| async move {
            music.render(&token).await.map(Rendered::from)
        }));

        let country = self.country.clone();
        tasks.push(spawn(ui, generation, PanelKind::Country, region, |token| async move {
            country.render(&token).await.map(Rendered::from)
        }));

        if let Some(dress) = self.dress.clone() {
            tasks.push(spawn(ui, generation, PanelKind::Dress, region, |token| async move {
                dress.render(&token).await.map(Rendered::from)
            }));
        }

        if let Some(scenery) = self.scenery.clone() {
            let store = ui.cloned();
            let opacity = self.ambient_opacity;
            tasks.push(spawn(ui, generation, PanelKind::Scenery, city, move |token| {
                render_scenery(scenery, token, opacity, store, generation)
            }));
        }

        FanOut {
            generation,
            place: candidate.clone(),
            tasks,
        }
    }
}

/// Render scenery and tint the page with its ambient color
async fn render_scenery(
    scenery: SceneryPanel,
    token: String,
    opacity: f32,
    ui: Option<UiStore>,
    generation: u64,
) -> Result<Rendered> {
    let render = scenery.render(&token).await?;
    let background = match render.ambient {
        Ok(color) => Some(color.overlay(opacity)),
        Err(e) => {
            warn!("Ambient color unavailable for '{}': {}", token, e);
            None
        }
    };
    if let (Some(ui), Some(overlay)) = (&ui, background) {
        ui.apply_background(generation, overlay);
    }
    Ok(Rendered {
        fragment: render.fragment,
        background,
    })
}

fn spawn<F, Fut>(
    ui: Option<&UiStore>,
    generation: u64,
    kind: PanelKind,
    token: &str,
    render: F,
) -> PanelTask
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<Rendered>> + Send + 'static,
{
    let store = ui.cloned();
    let rendering = render(token.to_string());
    let span = info_span!("panel", kind = ?kind, token = %token, generation);

    let handle = tokio::spawn(
        async move {
            let result = rendering.await;
            if let Err(e) = &result {
                warn!("Panel failed: {}", e);
            }
            if let Some(store) = &store {
                let view = PanelView::settled(result.as_ref().map(|rendered| &rendered.fragment));
                store.apply_view(generation, kind, view);
            }
            result
        }
        .instrument(span),
    );

    PanelTask {
        kind,
        token: token.to_string(),
        generation,
        ui: ui.cloned(),
        handle,
    }
}
