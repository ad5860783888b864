//! TheMealDB recipe-by-origin client

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{DishSource, endpoint};
use crate::Result;
use crate::config::VibeConfig;
use crate::http::{ApiClient, decode};
use crate::models::DishSummary;

const SERVICE: &str = "recipes";

pub struct MealDbClient {
    http: ApiClient,
    base_url: String,
}

/// `meals` is `null` when the area is unknown
#[derive(Debug, Deserialize)]
pub struct FilterResponse {
    pub meals: Option<Vec<Meal>>,
}

#[derive(Debug, Deserialize)]
pub struct Meal {
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb")]
    pub thumbnail: String,
}

impl MealDbClient {
    pub fn new(config: &VibeConfig, http: ApiClient) -> Self {
        Self {
            http,
            base_url: config.providers.meals_url.clone(),
        }
    }
}

#[async_trait]
impl DishSource for MealDbClient {
    #[instrument(skip(self))]
    async fn dishes(&self, country: &str) -> Result<Vec<DishSummary>> {
        let url = format!(
            "{}?a={}",
            endpoint(&self.base_url, "api/json/v1/1/filter.php"),
            urlencoding::encode(country)
        );

        let response = self.http.send(SERVICE, self.http.get(&url)).await?;
        let response: FilterResponse = decode(SERVICE, response).await?;
        let dishes = response.into_dishes();
        debug!("Found {} dishes for {}", dishes.len(), country);
        Ok(dishes)
    }
}

impl FilterResponse {
    pub fn into_dishes(self) -> Vec<DishSummary> {
        self.meals
            .unwrap_or_default()
            .into_iter()
            .map(|meal| DishSummary {
                name: meal.name,
                thumbnail_url: meal.thumbnail,
            })
            .collect()
    }
}
