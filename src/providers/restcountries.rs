//! REST Countries client

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{CountrySource, endpoint};
use crate::Result;
use crate::config::VibeConfig;
use crate::http::{ApiClient, decode};
use crate::models::CountryFacts;

const SERVICE: &str = "country facts";

pub struct RestCountriesClient {
    http: ApiClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct Country {
    pub name: CountryName,
    #[serde(default)]
    pub capital: Vec<String>,
    pub population: u64,
}

#[derive(Debug, Deserialize)]
pub struct CountryName {
    pub common: String,
}

impl RestCountriesClient {
    pub fn new(config: &VibeConfig, http: ApiClient) -> Self {
        Self {
            http,
            base_url: config.providers.countries_url.clone(),
        }
    }
}

#[async_trait]
impl CountrySource for RestCountriesClient {
    #[instrument(skip(self))]
    async fn countries(&self, name: &str) -> Result<Vec<CountryFacts>> {
        let url = endpoint(
            &self.base_url,
            &format!("v3.1/name/{}", urlencoding::encode(name)),
        );

        let response = self.http.send(SERVICE, self.http.get(&url)).await?;
        // Unknown names are answered with 404
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let countries: Vec<Country> = decode(SERVICE, response).await?;
        debug!("{} countries match '{}'", countries.len(), name);
        Ok(countries.into_iter().map(CountryFacts::from).collect())
    }
}

impl From<Country> for CountryFacts {
    fn from(country: Country) -> Self {
        Self {
            common_name: country.name.common,
            capitals: country.capital,
            population: country.population,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_conversion() {
        let countries: Vec<Country> = serde_json::from_str(
            r#"[{"name": {"common": "France", "official": "French Republic"},
                 "capital": ["Paris"], "population": 67391582, "region": "Europe"}]"#,
        )
        .unwrap();
        let facts: Vec<CountryFacts> = countries.into_iter().map(CountryFacts::from).collect();
        assert_eq!(facts[0].common_name, "France");
        assert_eq!(facts[0].capital(), "Paris");
        assert_eq!(facts[0].population, 67_391_582);
    }

    #[test]
    fn test_missing_capital_defaults_to_empty() {
        let countries: Vec<Country> = serde_json::from_str(
            r#"[{"name": {"common": "Antarctica"}, "population": 1000}]"#,
        )
        .unwrap();
        assert!(countries[0].capital.is_empty());
    }
}
