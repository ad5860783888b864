use std::sync::Arc;

use tracing::{instrument, warn};

use super::{PanelFragment, PanelKind, escape_html};
use crate::models::CountryFacts;
use crate::providers::CountrySource;
use crate::{Result, VibeError};

const SERVICE: &str = "country facts";

#[derive(Clone)]
pub struct CountryPanel {
    source: Arc<dyn CountrySource>,
    strict: bool,
}

impl CountryPanel {
    pub fn new(source: Arc<dyn CountrySource>, strict: bool) -> Self {
        Self { source, strict }
    }

    #[instrument(skip(self))]
    pub async fn render(&self, country: &str) -> Result<PanelFragment> {
        let candidates = self.source.countries(country).await?;
        let facts = pick_country(candidates, country, self.strict)?;
        Ok(PanelFragment::new(PanelKind::Country, to_html(&facts)))
    }
}

/// Exact common-name match wins; otherwise the provider's first record,
/// unless strict matching refuses to guess.
pub fn pick_country(
    mut candidates: Vec<CountryFacts>,
    query: &str,
    strict: bool,
) -> Result<CountryFacts> {
    if candidates.len() > 1 {
        let wanted = query.trim().to_lowercase();
        if let Some(position) = candidates
            .iter()
            .position(|facts| facts.common_name.to_lowercase() == wanted)
        {
            return Ok(candidates.swap_remove(position));
        }

        let names: Vec<String> = candidates.iter().map(|c| c.common_name.clone()).collect();
        if strict {
            return Err(VibeError::AmbiguousMatch {
                service: SERVICE.to_string(),
                query: query.to_string(),
                candidates: names,
            });
        }
        warn!("'{}' is ambiguous ({:?}), taking the first match", query, names);
    }

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| VibeError::empty(SERVICE, query))
}

pub fn to_html(facts: &CountryFacts) -> String {
    format!(
        "<h3>{}</h3>\n<p>Capital: {}</p>\n<p>Population: {}</p>",
        escape_html(&facts.common_name),
        escape_html(&facts.capital()),
        facts.population
    )
}
