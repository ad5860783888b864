//! Unsplash scenic photo search

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{Orientation, ScenerySource, endpoint};
use crate::Result;
use crate::config::{Credential, CredentialsConfig, VibeConfig};
use crate::http::{ApiClient, decode};
use crate::models::ScenicImage;

const SERVICE: &str = "scenic images";

pub struct UnsplashClient {
    http: ApiClient,
    access_key: Credential,
    base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct PhotoSearchResponse {
    #[serde(default)]
    pub results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
pub struct Photo {
    pub urls: PhotoUrls,
    pub alt_description: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PhotoUrls {
    pub regular: String,
}

impl UnsplashClient {
    pub fn new(config: &VibeConfig, http: ApiClient) -> Result<Self> {
        let access_key =
            CredentialsConfig::require(&config.credentials.unsplash_key, "unsplash_key")?.clone();
        Ok(Self {
            http,
            access_key,
            base_url: config.providers.scenery_url.clone(),
        })
    }
}

#[async_trait]
impl ScenerySource for UnsplashClient {
    #[instrument(skip(self))]
    async fn photos(&self, query: &str, orientation: Orientation) -> Result<Vec<ScenicImage>> {
        let mut url = format!(
            "{}?query={}&per_page=1",
            endpoint(&self.base_url, "search/photos"),
            urlencoding::encode(query)
        );
        if orientation == Orientation::Landscape {
            url.push_str("&orientation=landscape");
        }
        let request = self.http.get(&url).header(
            "Authorization",
            format!("Client-ID {}", self.access_key.expose()),
        );

        let response = self.http.send(SERVICE, request).await?;
        let response: PhotoSearchResponse = decode(SERVICE, response).await?;
        debug!("Found {} photos for '{}'", response.results.len(), query);
        Ok(response.into_images(query))
    }
}

impl PhotoSearchResponse {
    pub fn into_images(self, query: &str) -> Vec<ScenicImage> {
        self.results
            .into_iter()
            .map(|photo| ScenicImage {
                image_url: photo.urls.regular,
                description: photo.alt_description.unwrap_or_else(|| query.to_string()),
                provider_color: photo.color,
            })
            .collect()
    }
}
