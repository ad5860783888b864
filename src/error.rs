//! Error types and handling for the `CityVibe` aggregator

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the `CityVibe` aggregator
#[derive(Error, Debug)]
pub enum VibeError {
    /// Request rejected, timed out, or answered with an unexpected status
    #[error("Network failure calling {service}: {message}")]
    NetworkFailure { service: String, message: String },

    /// Provider answered, but an expected field is absent
    #[error("Malformed response from {service}: {message}")]
    MalformedResponse { service: String, message: String },

    /// Provider answered with an empty collection where a first element was needed
    #[error("No results from {service} for '{query}'")]
    EmptyResultSet { service: String, query: String },

    /// Provider answered with several candidates and none could be picked
    #[error("Ambiguous match from {service} for '{query}': {candidates:?}")]
    AmbiguousMatch {
        service: String,
        query: String,
        candidates: Vec<String>,
    },

    /// Image bytes could not be decoded
    #[error("Image decode error: {message}")]
    ImageDecode { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Panel task was aborted before it produced a result
    #[error("Panel task cancelled: {message}")]
    Cancelled { message: String },
}

/// Stable tag for each error kind, used by the UI state and the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NetworkFailure,
    MalformedResponse,
    EmptyResultSet,
    AmbiguousMatch,
    ImageDecode,
    Config,
    Validation,
    Cancelled,
}

impl VibeError {
    /// Create a new network failure
    pub fn network<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::NetworkFailure {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a new malformed response error
    pub fn malformed<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::MalformedResponse {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a new empty result set error
    pub fn empty<S: Into<String>, Q: Into<String>>(service: S, query: Q) -> Self {
        Self::EmptyResultSet {
            service: service.into(),
            query: query.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            VibeError::NetworkFailure { .. } => ErrorKind::NetworkFailure,
            VibeError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            VibeError::EmptyResultSet { .. } => ErrorKind::EmptyResultSet,
            VibeError::AmbiguousMatch { .. } => ErrorKind::AmbiguousMatch,
            VibeError::ImageDecode { .. } => ErrorKind::ImageDecode,
            VibeError::Config { .. } => ErrorKind::Config,
            VibeError::Validation { .. } => ErrorKind::Validation,
            VibeError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            VibeError::NetworkFailure { service, .. } => {
                format!("Unable to reach {service}. Please check your internet connection.")
            }
            VibeError::MalformedResponse { service, .. } => {
                format!("{service} returned something unexpected. The place may not be known there.")
            }
            VibeError::EmptyResultSet { service, query } => {
                format!("{service} has nothing for '{query}'.")
            }
            VibeError::AmbiguousMatch { query, .. } => {
                format!("'{query}' matches several places. Please be more specific.")
            }
            VibeError::ImageDecode { .. } => "The scenic image could not be read.".to_string(),
            VibeError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            VibeError::Validation { message } => format!("Invalid input: {message}"),
            VibeError::Cancelled { .. } => "This panel was interrupted.".to_string(),
        }
    }
}

impl From<image::ImageError> for VibeError {
    fn from(err: image::ImageError) -> Self {
        VibeError::ImageDecode {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = VibeError::network("weather", "connection refused");
        assert!(matches!(err, VibeError::NetworkFailure { .. }));
        assert_eq!(err.kind(), ErrorKind::NetworkFailure);

        let err = VibeError::empty("recipes", "Atlantis");
        assert_eq!(err.kind(), ErrorKind::EmptyResultSet);
        assert_eq!(err.to_string(), "No results from recipes for 'Atlantis'");
    }

    #[test]
    fn test_user_messages() {
        let err = VibeError::config("missing key");
        assert!(err.user_message().contains("Configuration error"));

        let err = VibeError::empty("recipes", "Atlantis");
        assert!(err.user_message().contains("Atlantis"));

        let err = VibeError::validation("empty city");
        assert!(err.user_message().contains("empty city"));
    }

    #[test]
    fn test_error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::EmptyResultSet).unwrap();
        assert_eq!(json, "\"empty_result_set\"");
    }
}
