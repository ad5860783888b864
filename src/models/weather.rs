//! Weather snapshot model

use serde::{Deserialize, Serialize};

/// Current conditions for one city
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Name as resolved by the provider
    pub location_name: String,
    /// Temperature in Celsius, as provided
    pub temperature_celsius: f64,
    /// Human-readable description of weather conditions
    pub condition_description: String,
    #[serde(default)]
    pub feels_like_celsius: Option<f64>,
    #[serde(default)]
    pub humidity_percent: Option<u32>,
    /// Wind speed in meters per second
    #[serde(default)]
    pub wind_speed_mps: Option<f64>,
    /// Provider icon code, e.g. "10d"
    #[serde(default)]
    pub icon: Option<String>,
}

impl WeatherSnapshot {
    /// Snapshot with only the required fields set
    #[must_use]
    pub fn new<L, D>(location_name: L, temperature_celsius: f64, condition_description: D) -> Self
    where
        L: Into<String>,
        D: Into<String>,
    {
        Self {
            location_name: location_name.into(),
            temperature_celsius,
            condition_description: condition_description.into(),
            feels_like_celsius: None,
            humidity_percent: None,
            wind_speed_mps: None,
            icon: None,
        }
    }

    /// Format temperature with unit. The provider's precision is kept as is.
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", self.temperature_celsius)
    }

    /// Feels-like temperature, humidity and wind, whichever the provider sent
    #[must_use]
    pub fn details(&self) -> Vec<String> {
        let mut details = Vec::new();
        if let Some(feels_like) = self.feels_like_celsius {
            details.push(format!("Feels like {feels_like}°C"));
        }
        if let Some(humidity) = self.humidity_percent {
            details.push(format!("Humidity {humidity}%"));
        }
        if let Some(wind) = self.wind_speed_mps {
            details.push(format!("Wind {wind} m/s"));
        }
        details
    }

    #[must_use]
    pub fn icon_url(&self) -> Option<String> {
        self.icon
            .as_ref()
            .map(|icon| format!("https://openweathermap.org/img/wn/{icon}@2x.png"))
    }
}
