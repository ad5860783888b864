//! Place autocomplete feed
//!
//! Every keystroke issues a query with no debouncing, so responses can come
//! back out of order. Each query takes a ticket; only the response for the
//! most recently issued ticket may replace the displayed suggestion list.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::Result;
use crate::models::PlaceCandidate;
use crate::providers::PlaceSearch;
use crate::ui::UiStore;

/// Outcome of one `suggest` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    pub ticket: u64,
    pub suggestions: Vec<PlaceCandidate>,
    /// A newer query was issued before this one resolved; the list was not shown
    pub stale: bool,
}

pub struct SuggestionFeed {
    search: Arc<dyn PlaceSearch>,
    limit: usize,
    issued: AtomicU64,
    ui: UiStore,
}

impl SuggestionFeed {
    pub fn new(search: Arc<dyn PlaceSearch>, limit: usize, ui: UiStore) -> Self {
        Self {
            search,
            limit,
            issued: AtomicU64::new(0),
            ui,
        }
    }

    #[instrument(skip(self))]
    pub async fn suggest(&self, query: &str) -> Result<Suggestions> {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let query = query.trim();
        let mut suggestions = if query.is_empty() {
            Vec::new()
        } else {
            self.search.search(query, self.limit).await?
        };
        suggestions.truncate(self.limit);

        let mut shown = false;
        self.ui.apply(|state| {
            if ticket == self.issued.load(Ordering::SeqCst) {
                shown = true;
                state.with_suggestions(ticket, suggestions.clone())
            } else {
                state
            }
        });

        if !shown {
            debug!("Dropping suggestions for superseded query #{}", ticket);
        }

        Ok(Suggestions {
            ticket,
            suggestions,
            stale: !shown,
        })
    }

    /// Ticket of the most recently issued query
    pub fn latest_ticket(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// Each query blocks until the test releases it
    struct GatedSearch {
        gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    }

    impl GatedSearch {
        fn new(queries: &[&str]) -> (Arc<Self>, HashMap<String, oneshot::Sender<()>>) {
            let mut gates = HashMap::new();
            let mut releases = HashMap::new();
            for query in queries {
                let (tx, rx) = oneshot::channel();
                gates.insert(query.to_string(), rx);
                releases.insert(query.to_string(), tx);
            }
            (
                Arc::new(Self {
                    gates: Mutex::new(gates),
                }),
                releases,
            )
        }
    }

    #[async_trait]
    impl PlaceSearch for GatedSearch {
        async fn search(&self, query: &str, _limit: usize) -> Result<Vec<PlaceCandidate>> {
            let gate = self.gates.lock().unwrap().remove(query);
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(vec![PlaceCandidate::new(
                format!("{query} result"),
                query,
                "United Kingdom",
            )])
        }
    }

    struct ManyResults;

    #[async_trait]
    impl PlaceSearch for ManyResults {
        async fn search(&self, query: &str, _limit: usize) -> Result<Vec<PlaceCandidate>> {
            Ok((0..8)
                .map(|i| PlaceCandidate::new(format!("{query} {i}"), format!("{query}{i}"), "X"))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_latest_issued_query_wins_over_latest_resolved() {
        let (search, mut releases) = GatedSearch::new(&["Lon", "London"]);
        let ui = UiStore::new();
        let feed = Arc::new(SuggestionFeed::new(search, 5, ui.clone()));

        let lon = tokio::spawn({
            let feed = feed.clone();
            async move { feed.suggest("Lon").await }
        });
        while feed.latest_ticket() < 1 {
            tokio::task::yield_now().await;
        }
        let london = tokio::spawn({
            let feed = feed.clone();
            async move { feed.suggest("London").await }
        });
        while feed.latest_ticket() < 2 {
            tokio::task::yield_now().await;
        }

        // "London" resolves first, "Lon" arrives late
        releases.remove("London").unwrap().send(()).unwrap();
        let london = london.await.unwrap().unwrap();
        releases.remove("Lon").unwrap().send(()).unwrap();
        let lon = lon.await.unwrap().unwrap();

        assert!(!london.stale);
        assert!(lon.stale);
        let displayed = ui.snapshot().suggestions;
        assert_eq!(displayed.len(), 1);
        assert_eq!(displayed[0].primary_token, "London");
    }

    #[tokio::test]
    async fn test_in_order_resolution_shows_latest() {
        let (search, _) = GatedSearch::new(&[]);
        let ui = UiStore::new();
        let feed = SuggestionFeed::new(search, 5, ui.clone());

        feed.suggest("Lon").await.unwrap();
        feed.suggest("London").await.unwrap();
        assert_eq!(ui.snapshot().suggestions[0].primary_token, "London");
    }

    #[tokio::test]
    async fn test_results_are_capped_in_provider_order() {
        let ui = UiStore::new();
        let feed = SuggestionFeed::new(Arc::new(ManyResults), 5, ui.clone());

        let result = feed.suggest("Par").await.unwrap();
        assert_eq!(result.suggestions.len(), 5);
        assert_eq!(result.suggestions[0].primary_token, "Par0");
        assert_eq!(result.suggestions[4].primary_token, "Par4");
        assert_eq!(ui.snapshot().suggestions, result.suggestions);
    }

    #[tokio::test]
    async fn test_empty_query_clears_the_list() {
        let ui = UiStore::new();
        let feed = SuggestionFeed::new(Arc::new(ManyResults), 5, ui.clone());

        feed.suggest("Par").await.unwrap();
        let result = feed.suggest("   ").await.unwrap();
        assert!(result.suggestions.is_empty());
        assert!(ui.snapshot().suggestions.is_empty());
    }
}
