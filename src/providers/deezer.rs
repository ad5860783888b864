//! Deezer track search through the RapidAPI proxy

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{TrackSource, endpoint};
use crate::config::{Credential, CredentialsConfig, VibeConfig};
use crate::http::{ApiClient, decode};
use crate::models::TrackSummary;
use crate::{Result, VibeError};

const SERVICE: &str = "track search";

pub struct DeezerClient {
    http: ApiClient,
    api_key: Credential,
    api_host: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub data: Option<Vec<Track>>,
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: Artist,
    pub preview: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Artist {
    pub name: String,
}

impl DeezerClient {
    pub fn new(config: &VibeConfig, http: ApiClient) -> Result<Self> {
        let api_key =
            CredentialsConfig::require(&config.credentials.rapidapi_key, "rapidapi_key")?.clone();
        Ok(Self {
            http,
            api_key,
            api_host: config.credentials.rapidapi_host.clone(),
            base_url: config.providers.music_url.clone(),
        })
    }
}

#[async_trait]
impl TrackSource for DeezerClient {
    #[instrument(skip(self))]
    async fn tracks(&self, query: &str) -> Result<Vec<TrackSummary>> {
        let url = format!(
            "{}?q={}",
            endpoint(&self.base_url, "search"),
            urlencoding::encode(query)
        );
        let request = self
            .http
            .get(&url)
            .header("X-RapidAPI-Key", self.api_key.expose())
            .header("X-RapidAPI-Host", self.api_host.as_str());

        let response = self.http.send(SERVICE, request).await?;
        let response: SearchResponse = decode(SERVICE, response).await?;
        let tracks = response.into_tracks()?;
        debug!("Found {} tracks for '{}'", tracks.len(), query);
        Ok(tracks)
    }
}

impl SearchResponse {
    pub fn into_tracks(self) -> Result<Vec<TrackSummary>> {
        if let Some(error) = self.error {
            return Err(VibeError::malformed(SERVICE, error.to_string()));
        }
        Ok(self
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|track| TrackSummary {
                title: track.title,
                artist_name: track.artist.name,
                preview_url: track.preview.unwrap_or_default(),
            })
            .collect())
    }
}
