//! Ambient color extraction
//!
//! The ambient tint is the color of the top-left pixel of a scenic image.
//! A single corner pixel is a cheap, deterministic proxy for the mood of the
//! picture, not a dominant-color analysis.

use image::GenericImageView;
use tracing::{debug, instrument};

use crate::Result;
use crate::VibeError;
use crate::http::ApiClient;
use crate::models::AmbientColor;

const SERVICE: &str = "image source";

/// Sample the pixel at (0,0) of an encoded image
pub fn sample_corner(bytes: &[u8]) -> Result<AmbientColor> {
    let image = image::load_from_memory(bytes)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(VibeError::ImageDecode {
            message: "image has no pixels".to_string(),
        });
    }
    let pixel = image.get_pixel(0, 0);
    Ok(AmbientColor::new(pixel[0], pixel[1], pixel[2]))
}

#[derive(Clone)]
pub struct ColorExtractor {
    http: ApiClient,
}

impl ColorExtractor {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    /// Load the image fully and sample its corner pixel
    #[instrument(skip(self))]
    pub async fn extract_ambient(&self, image_url: &str) -> Result<AmbientColor> {
        let bytes = self.http.fetch_bytes(SERVICE, image_url).await?;
        debug!("Loaded {} image bytes", bytes.len());

        // Decoding is CPU-bound, keep it off the async workers
        let color = tokio::task::spawn_blocking(move || sample_corner(&bytes))
            .await
            .map_err(|e| VibeError::Cancelled {
                message: e.to_string(),
            })??;

        debug!("Ambient color rgb({},{},{})", color.r, color.g, color.b);
        Ok(color)
    }
}
