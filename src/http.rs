//! Shared outbound HTTP client
//!
//! One `reqwest` client wrapped with transient-retry middleware. Providers
//! go through [`ApiClient::send`] so transport failures and unexpected
//! statuses map onto the same error kinds everywhere.

use std::time::Duration;

use reqwest::{Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;

use crate::config::HttpConfig;
use crate::{Result, VibeError};

#[derive(Clone)]
pub struct ApiClient {
    inner: ClientWithMiddleware,
}

impl ApiClient {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| VibeError::config(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let inner = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { inner })
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.inner.get(url)
    }

    /// Send a request. Success and `404 Not Found` are handed back to the
    /// caller, since several providers use 404 to mean "no match".
    pub async fn send(&self, service: &str, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| VibeError::network(service, e.to_string()))?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match status.as_u16() {
            401 | 403 => format!("{status}: credential rejected"),
            429 => format!("{status}: rate limit exceeded"),
            _ => format!("{status}: {}", truncate(&body, 200)),
        };
        Err(VibeError::network(service, message))
    }

    /// Download a resource's bytes in full
    pub async fn fetch_bytes(&self, service: &str, url: &str) -> Result<Vec<u8>> {
        let response = self.send(service, self.get(url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(VibeError::network(service, format!("{url} not found")));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| VibeError::network(service, e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Decode a JSON body, mapping shape mismatches to `MalformedResponse`
pub async fn decode<T: DeserializeOwned>(service: &str, response: Response) -> Result<T> {
    let body = response
        .text()
        .await
        .map_err(|e| VibeError::network(service, e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| VibeError::malformed(service, e.to_string()))
}

/// Explicit "first or none" lookup
pub fn first_or_empty<T>(items: Vec<T>, service: &str, query: &str) -> Result<T> {
    items
        .into_iter()
        .next()
        .ok_or_else(|| VibeError::empty(service, query))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_first_or_empty() {
        assert_eq!(first_or_empty(vec![3, 4], "svc", "q").unwrap(), 3);

        let err = first_or_empty(Vec::<u8>::new(), "recipes", "Atlantis").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResultSet);
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Zürich", 2), "Zü");
        assert_eq!(truncate("ab", 10), "ab");
    }

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new(&HttpConfig::default());
        assert!(client.is_ok());
    }
}
