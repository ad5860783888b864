use std::sync::Arc;

use tracing::instrument;

use super::{PanelFragment, PanelKind, escape_html};
use crate::Result;
use crate::models::WeatherSnapshot;
use crate::providers::WeatherSource;

#[derive(Clone)]
pub struct WeatherPanel {
    source: Arc<dyn WeatherSource>,
}

impl WeatherPanel {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }

    #[instrument(skip(self))]
    pub async fn render(&self, city: &str) -> Result<PanelFragment> {
        let snapshot = self.source.current(city).await?;
        Ok(PanelFragment::new(PanelKind::Weather, to_html(&snapshot)))
    }
}

pub fn to_html(snapshot: &WeatherSnapshot) -> String {
    let mut html = format!("<h3>{}</h3>\n", escape_html(&snapshot.location_name));
    if let Some(icon_url) = snapshot.icon_url() {
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\">\n",
            escape_html(&icon_url),
            escape_html(&snapshot.condition_description)
        ));
    }
    html.push_str(&format!(
        "<p>{}</p>\n<p>{}</p>",
        escape_html(&snapshot.format_temperature()),
        escape_html(&snapshot.condition_description)
    ));
    let details = snapshot.details();
    if !details.is_empty() {
        html.push_str(&format!("\n<p>{}</p>", escape_html(&details.join(", "))));
    }
    html
}
