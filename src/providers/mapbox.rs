//! Mapbox geocoding client

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{PlaceSearch, endpoint};
use crate::Result;
use crate::config::{Credential, CredentialsConfig, VibeConfig};
use crate::http::{ApiClient, decode};
use crate::models::PlaceCandidate;

const SERVICE: &str = "geocoding";
/// Largest `limit` the v5 geocoding endpoint accepts
const MAX_LIMIT: usize = 10;

pub struct MapboxClient {
    http: ApiClient,
    token: Credential,
    base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    pub place_name: String,
    pub text: String,
    #[serde(default)]
    pub context: Vec<ContextEntry>,
}

/// One link of the feature's context chain, e.g. `{"id": "country.123", "text": "France"}`
#[derive(Debug, Deserialize)]
pub struct ContextEntry {
    pub id: String,
    pub text: String,
}

impl MapboxClient {
    pub fn new(config: &VibeConfig, http: ApiClient) -> Result<Self> {
        let token =
            CredentialsConfig::require(&config.credentials.mapbox_token, "mapbox_token")?.clone();
        Ok(Self {
            http,
            token,
            base_url: config.providers.geocoding_url.clone(),
        })
    }

    fn search_url(&self, query: &str, limit: usize) -> String {
        format!(
            "{}?access_token={}&limit={}",
            endpoint(
                &self.base_url,
                &format!(
                    "geocoding/v5/mapbox.places/{}.json",
                    urlencoding::encode(query)
                )
            ),
            urlencoding::encode(self.token.expose()),
            limit.min(MAX_LIMIT)
        )
    }
}

#[async_trait]
impl PlaceSearch for MapboxClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<PlaceCandidate>> {
        let limit = limit.min(MAX_LIMIT);
        let url = self.search_url(query, limit);

        let response = self.http.send(SERVICE, self.http.get(&url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let response: GeocodingResponse = decode(SERVICE, response).await?;

        let candidates: Vec<PlaceCandidate> = response
            .features
            .into_iter()
            .take(limit)
            .map(Feature::into_candidate)
            .collect();
        debug!("Geocoding returned {} candidates", candidates.len());
        Ok(candidates)
    }
}

impl Feature {
    /// The broader region is the `country` link of the context chain, falling
    /// back to the outermost link, and finally to the place itself.
    fn region(&self) -> String {
        self.context
            .iter()
            .find(|entry| entry.id.starts_with("country."))
            .or_else(|| self.context.last())
            .map_or_else(|| self.text.clone(), |entry| entry.text.clone())
    }

    pub fn into_candidate(self) -> PlaceCandidate {
        let region = self.region();
        PlaceCandidate::new(self.place_name, self.text, region)
    }
}
