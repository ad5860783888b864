//! UI state
//!
//! The page is an explicit [`UiState`] value. Every change is a pure
//! `UiState -> UiState` function and goes through [`UiStore::apply`], the one
//! place where the shared state is mutated. Subscribers get every snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::{Result, VibeError};
use crate::error::ErrorKind;
use crate::models::{Overlay, PlaceCandidate};
use crate::panels::{PanelFragment, PanelKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PanelView {
    Loading,
    Ready { html: String },
    Failed { error: ErrorKind, message: String },
}

impl PanelView {
    pub fn from_result(result: &Result<PanelFragment>) -> Self {
        Self::settled(result.as_ref())
    }

    pub fn settled(result: std::result::Result<&PanelFragment, &VibeError>) -> Self {
        match result {
            Ok(fragment) => PanelView::Ready {
                html: fragment.html.clone(),
            },
            Err(e) => PanelView::Failed {
                error: e.kind(),
                message: e.user_message(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiState {
    /// Sequence number of the current place selection
    pub generation: u64,
    pub place: Option<PlaceCandidate>,
    pub suggestions: Vec<PlaceCandidate>,
    /// Ticket of the query that produced `suggestions`
    pub suggestions_ticket: u64,
    pub panels: BTreeMap<PanelKind, PanelView>,
    pub background: Option<Overlay>,
    /// Selection the background was sampled for
    pub background_generation: u64,
}

impl UiState {
    /// Start a new selection: all previous panel content is discarded
    #[must_use]
    pub fn select(self, place: PlaceCandidate, kinds: &[PanelKind]) -> Self {
        Self {
            generation: self.generation + 1,
            place: Some(place),
            panels: kinds.iter().map(|kind| (*kind, PanelView::Loading)).collect(),
            ..self
        }
    }

    /// Settle a loading panel. Results for an older selection are dropped,
    /// and a panel settles only once per selection.
    #[must_use]
    pub fn with_panel(mut self, generation: u64, kind: PanelKind, view: PanelView) -> Self {
        if generation != self.generation {
            return self;
        }
        if let Some(current) = self.panels.get_mut(&kind)
            && *current == PanelView::Loading
        {
            *current = view;
        }
        self
    }

    #[must_use]
    pub fn with_background(mut self, generation: u64, overlay: Overlay) -> Self {
        if generation == self.generation {
            self.background = Some(overlay);
            self.background_generation = generation;
        }
        self
    }

    /// Replace the whole suggestion list, unless a newer query already did
    #[must_use]
    pub fn with_suggestions(mut self, ticket: u64, suggestions: Vec<PlaceCandidate>) -> Self {
        if ticket >= self.suggestions_ticket {
            self.suggestions = suggestions;
            self.suggestions_ticket = ticket;
        }
        self
    }

    pub fn panel(&self, kind: PanelKind) -> Option<&PanelView> {
        self.panels.get(&kind)
    }

    /// True once no panel of the current selection is still loading
    pub fn is_settled(&self) -> bool {
        !self
            .panels
            .values()
            .any(|view| matches!(view, PanelView::Loading))
    }
}

#[derive(Clone)]
pub struct UiStore {
    state: watch::Sender<UiState>,
}

impl Default for UiStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UiStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(UiState::default());
        Self { state }
    }

    /// The single mutation point. The update runs under the channel lock, so
    /// the check-and-replace in each `UiState` function is atomic.
    pub fn apply<F>(&self, update: F) -> UiState
    where
        F: FnOnce(UiState) -> UiState,
    {
        let mut snapshot = UiState::default();
        self.state.send_modify(|state| {
            *state = update(std::mem::take(state));
            snapshot = state.clone();
        });
        snapshot
    }

    pub fn snapshot(&self) -> UiState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    pub fn begin_selection(&self, place: PlaceCandidate, kinds: &[PanelKind]) -> u64 {
        let state = self.apply(|state| state.select(place, kinds));
        debug!("Selection {} started", state.generation);
        state.generation
    }

    pub fn apply_panel(&self, generation: u64, kind: PanelKind, result: &Result<PanelFragment>) {
        self.apply_view(generation, kind, PanelView::from_result(result));
    }

    pub fn apply_view(&self, generation: u64, kind: PanelKind, view: PanelView) {
        self.apply(|state| state.with_panel(generation, kind, view));
    }

    pub fn apply_background(&self, generation: u64, overlay: Overlay) {
        self.apply(|state| state.with_background(generation, overlay));
    }
}
