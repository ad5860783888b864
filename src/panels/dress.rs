use std::sync::Arc;

use tracing::instrument;

use super::{PanelFragment, PanelKind, escape_html};
use crate::Result;
use crate::http::first_or_empty;
use crate::models::ScenicImage;
use crate::providers::{Orientation, ScenerySource};

/// Traditional dress of a country, from the photo search
#[derive(Clone)]
pub struct DressPanel {
    source: Arc<dyn ScenerySource>,
}

impl DressPanel {
    pub fn new(source: Arc<dyn ScenerySource>) -> Self {
        Self { source }
    }

    #[must_use]
    pub fn query_for(country: &str) -> String {
        format!("{} traditional dress costume", country.trim())
    }

    #[instrument(skip(self))]
    pub async fn render(&self, country: &str) -> Result<PanelFragment> {
        let query = Self::query_for(country);
        let photos = self.source.photos(&query, Orientation::Any).await?;
        let image = first_or_empty(photos, "dress images", &query)?;
        Ok(PanelFragment::new(PanelKind::Dress, to_html(&image)))
    }
}

pub fn to_html(image: &ScenicImage) -> String {
    format!(
        "<h3>Traditional Dress</h3>\n<img src=\"{}\" alt=\"{}\" width=\"100%\">",
        escape_html(&image.image_url),
        escape_html(&image.description)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPhotos {
        queries: Mutex<Vec<(String, Orientation)>>,
        empty: bool,
    }

    #[async_trait]
    impl ScenerySource for RecordingPhotos {
        async fn photos(&self, query: &str, orientation: Orientation) -> Result<Vec<ScenicImage>> {
            self.queries.lock().unwrap().push((query.to_string(), orientation));
            if self.empty {
                return Ok(Vec::new());
            }
            Ok(vec![ScenicImage {
                image_url: "https://images/kimono.jpg".to_string(),
                description: "woman in a kimono".to_string(),
                provider_color: None,
            }])
        }
    }

    #[tokio::test]
    async fn test_dress_query_uses_the_country() {
        let photos = Arc::new(RecordingPhotos::default());
        let fragment = DressPanel::new(photos.clone()).render("Japan").await.unwrap();

        assert_eq!(
            *photos.queries.lock().unwrap(),
            vec![("Japan traditional dress costume".to_string(), Orientation::Any)]
        );
        assert_eq!(fragment.kind, PanelKind::Dress);
        assert!(fragment.html.contains("alt=\"woman in a kimono\""));
    }

    #[tokio::test]
    async fn test_no_photos_is_empty_result_set() {
        let photos = Arc::new(RecordingPhotos {
            empty: true,
            ..RecordingPhotos::default()
        });
        let err = DressPanel::new(photos).render("Atlantis").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResultSet);
    }
}
