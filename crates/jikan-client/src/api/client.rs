//! Jikan API client with plain and retrying requests.

use super::endpoint::Endpoint;
use super::retry::{retry_fixed, RetryPolicy};
use crate::error::FetchError;
use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::config::ApiConfig;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Jikan API v4 client
#[derive(Debug, Clone)]
pub struct JikanClient {
    /// HTTP client
    client: Client,
    /// Base URL for Jikan API
    base_url: Url,
    /// Policy for retrying requests
    retry: RetryPolicy,
}

impl JikanClient {
    /// Create a new Jikan client
    pub fn new(base_url: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("API base URL cannot carry paths: {}", base_url);
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("anime-catalog/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            retry,
        })
    }

    /// Create a client from the `[api]` config section
    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        Self::new(
            &api.base_url,
            api.timeout(),
            RetryPolicy::new(api.max_attempts, api.retry_delay()),
        )
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Absolute URL of an endpoint, query values encoded
    pub fn url_for(&self, endpoint: &Endpoint) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(endpoint.segments());
        }

        let query = endpoint.query();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        url
    }

    /// Single GET attempt returning the response body.
    ///
    /// Only transport failures and non-success statuses are errors here; the
    /// body is not inspected.
    pub async fn get_body(&self, url: &Url) -> Result<String, FetchError> {
        debug!(url = %url, "Making API request");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Request failed");
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

        debug!(url = %url, bytes = body.len(), "Request successful");
        Ok(body)
    }

    /// Single GET attempt returning the raw JSON payload
    pub async fn get_value(&self, url: &Url) -> Result<Value, FetchError> {
        let body = self.get_body(url).await?;
        parse_body(url, &body)
    }

    /// Plain request: one attempt, no cache
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, FetchError> {
        let url = self.url_for(endpoint);
        let value = self.get_value(&url).await?;
        decode(&url, value)
    }

    /// Retrying request: fixed attempts with a fixed delay, no cache
    pub async fn get_with_retry<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
    ) -> Result<T, FetchError> {
        let url = self.url_for(endpoint);
        let client = self;
        let target = &url;
        let name = endpoint.to_string();

        let body = retry_fixed(&self.retry, &name, move || client.get_body(target)).await?;
        let value = parse_body(&url, &body)?;
        decode(&url, value)
    }
}

fn parse_body(url: &Url, body: &str) -> Result<Value, FetchError> {
    serde_json::from_str(body).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Decode a JSON payload into a typed response
pub fn decode<T: DeserializeOwned>(url: &Url, value: Value) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Genre, PaginatedResponse};

    fn client_for(server: &mockito::Server, attempts: u32) -> JikanClient {
        JikanClient::new(
            &server.url(),
            Duration::from_secs(5),
            RetryPolicy::new(attempts, Duration::from_millis(10)),
        )
        .unwrap()
    }

    #[test]
    fn test_client_creation() {
        let api = ApiConfig {
            max_attempts: 5,
            retry_delay_ms: 250,
            ..ApiConfig::default()
        };
        let client = JikanClient::from_config(&api).unwrap();
        assert_eq!(client.retry_policy().attempts(), 5);
        assert_eq!(client.retry_policy().delay, Duration::from_millis(250));
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let client = JikanClient::new("not a url", Duration::from_secs(1), RetryPolicy::default());
        assert!(client.is_err());
    }

    #[test]
    fn test_url_for_keeps_base_path_and_encodes_query() {
        let client = JikanClient::from_config(&ApiConfig::default()).unwrap();

        let url = client.url_for(&Endpoint::Search {
            query: "one piece & co".to_string(),
            page: 1,
        });
        assert_eq!(
            url.as_str(),
            "https://api.jikan.moe/v4/anime?q=one+piece+%26+co&page=1"
        );

        let url = client.url_for(&Endpoint::Episodes(21));
        assert_eq!(url.as_str(), "https://api.jikan.moe/v4/anime/21/episodes");
    }

    #[tokio::test]
    async fn test_get_decodes_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/genres/anime")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":[{"mal_id":1,"name":"Action","count":5000}]}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, 3);
        let response: PaginatedResponse<Genre> = client.get(&Endpoint::Genres).await.unwrap();

        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].name, "Action");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_reports_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/seasons/upcoming")
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(&server, 3);
        let result: Result<Value, FetchError> = client.get(&Endpoint::SeasonUpcoming).await;

        match result {
            Err(FetchError::Status { status, .. }) => assert_eq!(status.as_u16(), 500),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_reports_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/seasons/now")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = client_for(&server, 3);
        let result: Result<Value, FetchError> = client.get(&Endpoint::SeasonNow).await;
        assert!(matches!(result, Err(FetchError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_retry_does_not_repeat_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/anime/1")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, 3);
        let result: Result<Value, FetchError> = client.get_with_retry(&Endpoint::Anime(1)).await;

        match result {
            Err(error @ FetchError::Decode { .. }) => assert_eq!(error.attempts(), 1),
            other => panic!("expected decode error, got {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_retry_treats_not_found_like_any_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/anime/999999")
            .with_status(404)
            .expect(3)
            .create_async()
            .await;

        let client = client_for(&server, 3);
        let result: Result<Value, FetchError> = client.get_with_retry(&Endpoint::Anime(999999)).await;

        match result {
            Err(FetchError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected RetriesExhausted, got {:?}", other),
        }
        mock.assert_async().await;
    }
}
