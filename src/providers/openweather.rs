//! OpenWeather current conditions client

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{WeatherSource, endpoint};
use crate::config::{Credential, CredentialsConfig, VibeConfig};
use crate::http::{ApiClient, decode};
use crate::models::WeatherSnapshot;
use crate::{Result, VibeError};

const SERVICE: &str = "weather";

pub struct OpenWeatherClient {
    http: ApiClient,
    api_key: Credential,
    base_url: String,
}

/// Current weather response. Every field is optional because a "city not
/// found" answer shares the endpoint and only carries `cod` and `message`.
#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    pub name: Option<String>,
    pub main: Option<MainBlock>,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub wind: Option<WindBlock>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MainBlock {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WindBlock {
    pub speed: Option<f64>,
}

impl OpenWeatherClient {
    pub fn new(config: &VibeConfig, http: ApiClient) -> Result<Self> {
        let api_key =
            CredentialsConfig::require(&config.credentials.openweather_key, "openweather_key")?
                .clone();
        Ok(Self {
            http,
            api_key,
            base_url: config.providers.weather_url.clone(),
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn current(&self, city: &str) -> Result<WeatherSnapshot> {
        let url = format!(
            "{}?q={}&appid={}&units=metric",
            endpoint(&self.base_url, "data/2.5/weather"),
            urlencoding::encode(city),
            urlencoding::encode(self.api_key.expose())
        );

        let response = self.http.send(SERVICE, self.http.get(&url)).await?;
        let response: CurrentWeatherResponse = decode(SERVICE, response).await?;
        let snapshot = response.into_snapshot()?;
        debug!(
            "Weather for {}: {}",
            snapshot.location_name,
            snapshot.format_temperature()
        );
        Ok(snapshot)
    }
}

impl CurrentWeatherResponse {
    pub fn into_snapshot(self) -> Result<WeatherSnapshot> {
        let reason = self.message.unwrap_or_else(|| "no matching city".to_string());
        let location_name = self
            .name
            .ok_or_else(|| VibeError::malformed(SERVICE, format!("missing name ({reason})")))?;
        let main = self
            .main
            .ok_or_else(|| VibeError::malformed(SERVICE, "missing main"))?;
        let temperature_celsius = main
            .temp
            .ok_or_else(|| VibeError::malformed(SERVICE, "missing main.temp"))?;
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| VibeError::malformed(SERVICE, "missing weather[0]"))?;
        let condition_description = condition
            .description
            .ok_or_else(|| VibeError::malformed(SERVICE, "missing weather[0].description"))?;

        Ok(WeatherSnapshot {
            feels_like_celsius: main.feels_like,
            humidity_percent: main.humidity,
            wind_speed_mps: self.wind.and_then(|wind| wind.speed),
            icon: condition.icon,
            ..WeatherSnapshot::new(location_name, temperature_celsius, condition_description)
        })
    }
}
