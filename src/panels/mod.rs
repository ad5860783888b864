//! Panel renderers
//!
//! A renderer takes one token, asks its provider, shape-checks the answer and
//! produces a complete HTML fragment for its panel. A fragment is only built
//! once every field it needs is present, so a panel is never half-rendered.

use serde::{Deserialize, Serialize};

pub mod country;
pub mod dish;
pub mod dress;
pub mod music;
pub mod scenery;
pub mod weather;

pub use country::CountryPanel;
pub use dish::DishPanel;
pub use dress::DressPanel;
pub use music::MusicPanel;
pub use scenery::{SceneryPanel, SceneryRender};
pub use weather::WeatherPanel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    Weather,
    Dish,
    Music,
    Country,
    Dress,
    Scenery,
}

impl PanelKind {
    /// Panels fed with the city token; the rest get the region token
    #[must_use]
    pub fn uses_city_token(self) -> bool {
        matches!(self, PanelKind::Weather | PanelKind::Scenery)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PanelKind::Weather => "Weather",
            PanelKind::Dish => "Famous Dish",
            PanelKind::Music => "Music",
            PanelKind::Country => "Country",
            PanelKind::Dress => "Traditional Dress",
            PanelKind::Scenery => "Scenery",
        }
    }
}

/// Fully rendered content for one panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelFragment {
    pub kind: PanelKind,
    pub html: String,
}

impl PanelFragment {
    pub fn new(kind: PanelKind, html: String) -> Self {
        Self { kind, html }
    }
}

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
