use std::sync::Arc;

use tracing::instrument;

use super::{PanelFragment, PanelKind, escape_html};
use crate::models::TrackSummary;
use crate::playback::{PlaybackId, PreviewDeck};
use crate::providers::TrackSource;
use crate::{Result, VibeError};

#[derive(Clone)]
pub struct MusicPanel {
    source: Arc<dyn TrackSource>,
    qualifier: String,
    deck: Arc<PreviewDeck>,
}

impl MusicPanel {
    pub fn new(
        source: Arc<dyn TrackSource>,
        qualifier: impl Into<String>,
        deck: Arc<PreviewDeck>,
    ) -> Self {
        Self {
            source,
            qualifier: qualifier.into(),
            deck,
        }
    }

    /// Search text for a region, e.g. "France traditional"
    #[must_use]
    pub fn query_for(&self, region: &str) -> String {
        format!("{} {}", region.trim(), self.qualifier)
    }

    /// Renders the first playable track in provider order
    #[instrument(skip(self))]
    pub async fn render(&self, region: &str) -> Result<PanelFragment> {
        let query = self.query_for(region);
        let tracks = self.source.tracks(&query).await?;
        let track = tracks
            .into_iter()
            .find(TrackSummary::is_playable)
            .ok_or_else(|| VibeError::empty("track search", query.clone()))?;
        Ok(PanelFragment::new(PanelKind::Music, to_html(&track)))
    }

    /// Fire-and-forget playback; see [`PreviewDeck::play`]
    pub fn play(&self, preview_url: &str) -> PlaybackId {
        self.deck.play(preview_url)
    }

    pub fn deck(&self) -> &Arc<PreviewDeck> {
        &self.deck
    }
}

pub fn to_html(track: &TrackSummary) -> String {
    format!(
        "<h3>{}</h3>\n<p>{}</p>\n<button class=\"play\" data-preview=\"{}\">Play</button>",
        escape_html(&track.title),
        escape_html(&track.artist_name),
        escape_html(&track.preview_url)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::playback::AudioOutput;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingTracks {
        queries: Mutex<Vec<String>>,
        tracks: Vec<TrackSummary>,
    }

    #[async_trait]
    impl TrackSource for RecordingTracks {
        async fn tracks(&self, query: &str) -> Result<Vec<TrackSummary>> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self.tracks.clone())
        }
    }

    struct SilentOutput;

    #[async_trait]
    impl AudioOutput for SilentOutput {
        async fn stream(&self, _id: PlaybackId, _preview_url: &str) -> Result<()> {
            Ok(())
        }
    }

    fn track(title: &str, preview: &str) -> TrackSummary {
        TrackSummary {
            title: title.to_string(),
            artist_name: "Artist".to_string(),
            preview_url: preview.to_string(),
        }
    }

    fn panel(tracks: Vec<TrackSummary>) -> (MusicPanel, Arc<RecordingTracks>) {
        let source = Arc::new(RecordingTracks {
            queries: Mutex::new(Vec::new()),
            tracks,
        });
        let deck = Arc::new(PreviewDeck::new(Arc::new(SilentOutput)));
        (MusicPanel::new(source.clone(), "traditional", deck), source)
    }

    #[tokio::test]
    async fn test_query_appends_qualifier() {
        let (panel, source) = panel(vec![track("Song", "https://cdn/1.mp3")]);
        panel.render("France").await.unwrap();
        assert_eq!(*source.queries.lock().unwrap(), vec!["France traditional"]);
    }

    #[tokio::test]
    async fn test_first_playable_track_is_rendered() {
        let (panel, _) = panel(vec![
            track("Silent", ""),
            track("La Vie en rose", "https://cdn/2.mp3"),
            track("Later", "https://cdn/3.mp3"),
        ]);
        let fragment = panel.render("France").await.unwrap();
        assert!(fragment.html.contains("<h3>La Vie en rose</h3>"));
        assert!(fragment.html.contains("data-preview=\"https://cdn/2.mp3\""));
    }

    #[tokio::test]
    async fn test_no_tracks_is_empty_result_set() {
        let (panel, _) = panel(Vec::new());
        let err = panel.render("Atlantis").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResultSet);
    }
}
