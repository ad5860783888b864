//! Configuration management for the `CityVibe` aggregator
//!
//! Handles loading configuration from files and environment variables and
//! validates every setting. Credentials are resolved here at startup and are
//! never part of the compiled artifact.

use crate::VibeError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VibeConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub music: MusicConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub ambient: AmbientConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_http_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Base URLs of the external services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    #[serde(default = "default_weather_url")]
    pub weather_url: String,
    #[serde(default = "default_meals_url")]
    pub meals_url: String,
    #[serde(default = "default_music_url")]
    pub music_url: String,
    #[serde(default = "default_countries_url")]
    pub countries_url: String,
    #[serde(default = "default_scenery_url")]
    pub scenery_url: String,
}

/// Static credentials for the gated services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub mapbox_token: Option<Credential>,
    pub openweather_key: Option<Credential>,
    pub rapidapi_key: Option<Credential>,
    /// Host header for the track-search proxy (not a secret)
    #[serde(default = "default_rapidapi_host")]
    pub rapidapi_host: String,
    pub unsplash_key: Option<Credential>,
}

/// Autocomplete feed settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

/// Music panel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicConfig {
    /// Qualifier appended to the region token for the track search
    #[serde(default = "default_music_qualifier")]
    pub qualifier: String,
    /// Directory where preview streams are spooled
    #[serde(default = "default_spool_dir")]
    pub spool_dir: String,
}

/// Matching policy for providers that may return several candidates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Fail with `AmbiguousMatch` instead of taking the first candidate
    #[serde(default)]
    pub strict: bool,
}

/// Ambient background settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbientConfig {
    #[serde(default = "default_ambient_opacity")]
    pub opacity: f32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Static frontend served as fallback when the directory exists
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// A secret value. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

// Default value functions
fn default_http_timeout() -> u32 {
    15
}

fn default_http_max_retries() -> u32 {
    2
}

fn default_user_agent() -> String {
    format!("CityVibe/{}", env!("CARGO_PKG_VERSION"))
}

fn default_geocoding_url() -> String {
    "https://api.mapbox.com".to_string()
}

fn default_weather_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_meals_url() -> String {
    "https://www.themealdb.com".to_string()
}

fn default_music_url() -> String {
    "https://deezerdevs-deezer.p.rapidapi.com".to_string()
}

fn default_countries_url() -> String {
    "https://restcountries.com".to_string()
}

fn default_scenery_url() -> String {
    "https://api.unsplash.com".to_string()
}

fn default_rapidapi_host() -> String {
    "deezerdevs-deezer.p.rapidapi.com".to_string()
}

fn default_max_suggestions() -> usize {
    5
}

fn default_music_qualifier() -> String {
    "traditional".to_string()
}

fn default_spool_dir() -> String {
    std::env::temp_dir()
        .join("cityvibe-previews")
        .to_string_lossy()
        .into_owned()
}

fn default_ambient_opacity() -> f32 {
    0.3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "frontend/dist".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_http_timeout(),
            max_retries: default_http_max_retries(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            weather_url: default_weather_url(),
            meals_url: default_meals_url(),
            music_url: default_music_url(),
            countries_url: default_countries_url(),
            scenery_url: default_scenery_url(),
        }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            mapbox_token: None,
            openweather_key: None,
            rapidapi_key: None,
            rapidapi_host: default_rapidapi_host(),
            unsplash_key: None,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            qualifier: default_music_qualifier(),
            spool_dir: default_spool_dir(),
        }
    }
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            opacity: default_ambient_opacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl CredentialsConfig {
    /// Resolve a required credential or fail with a configuration error naming it
    pub fn require<'a>(
        credential: &'a Option<Credential>,
        name: &str,
    ) -> std::result::Result<&'a Credential, VibeError> {
        credential.as_ref().ok_or_else(|| {
            VibeError::config(format!(
                "Missing credential '{name}'. Set it in the config file or via CITYVIBE_CREDENTIALS__{}",
                name.to_uppercase()
            ))
        })
    }
}

impl VibeConfig {
    /// Load configuration from the default locations and the environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // CITYVIBE_CREDENTIALS__MAPBOX_TOKEN -> credentials.mapbox_token
        builder = builder.add_source(
            Environment::with_prefix("CITYVIBE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: VibeConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cityvibe").join("config.toml"))
    }

    /// Apply default values to fields that were given but left empty
    pub fn apply_defaults(&mut self) {
        if self.http.timeout_seconds == 0 {
            self.http.timeout_seconds = default_http_timeout();
        }
        if self.http.user_agent.is_empty() {
            self.http.user_agent = default_user_agent();
        }
        if self.feed.max_suggestions == 0 {
            self.feed.max_suggestions = default_max_suggestions();
        }
        if self.music.qualifier.trim().is_empty() {
            self.music.qualifier = default_music_qualifier();
        }
        if self.credentials.rapidapi_host.is_empty() {
            self.credentials.rapidapi_host = default_rapidapi_host();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_credentials()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.http.timeout_seconds > 300 {
            return Err(VibeError::config("HTTP timeout cannot exceed 300 seconds").into());
        }

        if self.http.max_retries > 10 {
            return Err(VibeError::config("HTTP max retries cannot exceed 10").into());
        }

        if self.feed.max_suggestions > 10 {
            return Err(VibeError::config("Maximum suggestions cannot exceed 10").into());
        }

        if !(0.0..=1.0).contains(&self.ambient.opacity) {
            return Err(VibeError::config("Ambient opacity must be between 0 and 1").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(VibeError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(VibeError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("geocoding", &self.providers.geocoding_url),
            ("weather", &self.providers.weather_url),
            ("meals", &self.providers.meals_url),
            ("music", &self.providers.music_url),
            ("countries", &self.providers.countries_url),
            ("scenery", &self.providers.scenery_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(VibeError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Credentials are optional, but a provided one must not be blank
    fn validate_credentials(&self) -> Result<()> {
        let credentials = [
            ("mapbox_token", &self.credentials.mapbox_token),
            ("openweather_key", &self.credentials.openweather_key),
            ("rapidapi_key", &self.credentials.rapidapi_key),
            ("unsplash_key", &self.credentials.unsplash_key),
        ];
        for (name, credential) in credentials {
            if let Some(credential) = credential
                && credential.expose().trim().is_empty()
            {
                return Err(VibeError::config(format!(
                    "Credential '{name}' cannot be empty if provided. Either remove it or provide a valid key."
                ))
                .into());
            }
        }
        Ok(())
    }
}
