use std::sync::Arc;

use tracing::{instrument, warn};

use super::{PanelFragment, PanelKind, escape_html};
use crate::Result;
use crate::ambient::ColorExtractor;
use crate::http::first_or_empty;
use crate::models::{AmbientColor, ScenicImage};
use crate::providers::{Orientation, ScenerySource};

/// Image fragment plus the ambient color sampled from the same image.
/// The color may fail on its own without taking the fragment down.
pub struct SceneryRender {
    pub fragment: PanelFragment,
    pub ambient: Result<AmbientColor>,
}

#[derive(Clone)]
pub struct SceneryPanel {
    source: Arc<dyn ScenerySource>,
    extractor: ColorExtractor,
}

impl SceneryPanel {
    pub fn new(source: Arc<dyn ScenerySource>, extractor: ColorExtractor) -> Self {
        Self { source, extractor }
    }

    #[instrument(skip(self))]
    pub async fn render(&self, city: &str) -> Result<SceneryRender> {
        let query = format!("{} scenic", city.trim());
        let photos = self.source.photos(&query, Orientation::Landscape).await?;
        let image = first_or_empty(photos, "scenic images", &query)?;
        let ambient = self.ambient_for(&image).await;
        Ok(SceneryRender {
            fragment: PanelFragment::new(PanelKind::Scenery, to_html(&image)),
            ambient,
        })
    }

    /// Sample the image; fall back to the provider's color hint if that fails
    async fn ambient_for(&self, image: &ScenicImage) -> Result<AmbientColor> {
        let e = match self.extractor.extract_ambient(&image.image_url).await {
            Ok(color) => return Ok(color),
            Err(e) => e,
        };
        match image.provider_color.as_deref().and_then(AmbientColor::from_hex) {
            Some(color) => {
                warn!("Sampling {} failed ({}), using provider color", image.image_url, e);
                Ok(color)
            }
            None => Err(e),
        }
    }
}

pub fn to_html(image: &ScenicImage) -> String {
    format!(
        "<img src=\"{}\" alt=\"{}\" width=\"100%\" crossorigin=\"anonymous\">",
        escape_html(&image.image_url),
        escape_html(&image.description)
    )
}
