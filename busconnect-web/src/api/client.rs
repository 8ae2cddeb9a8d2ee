//! BusConnect backend HTTP client.
//!
//! Provides async methods for every backend endpoint the frontend uses.
//! Handles concurrency limiting, status mapping and JSON decoding.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::query::{JourneyQuery, ScheduleQuery};

use super::BusApi;
use super::error::ApiError;
use super::types::{Journey, JourneyPage, SchedulePage, Stop, StopsResponse, TypesResponse};

/// Default base URL of the backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest body excerpt kept in a JSON error.
const BODY_EXCERPT_CHARS: usize = 500;

/// Configuration for the backend client.
#[derive(Debug, Clone)]
pub struct BusApiConfig {
    /// Base URL, without a trailing slash
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl BusApiConfig {
    /// Create a config pointing at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n.max(1);
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for BusApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// BusConnect backend client.
///
/// Cheap to clone; clones share the connection pool and the concurrency
/// semaphore.
#[derive(Debug, Clone)]
pub struct BusApiClient {
    http: reqwest::Client,
    base_url: Url,
    semaphore: Arc<Semaphore>,
}

impl BusApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: BusApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ApiError::InvalidUrl(config.base_url.clone()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL for the endpoint at `segments` below the base URL.
    ///
    /// Each segment is percent-encoded, so `/`, `?` and `..` inside one
    /// cannot change which endpoint is addressed.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET the endpoint at `segments` with `query` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ApiError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = self.endpoint(segments)?;
        debug!(%url, params = query.len(), "backend request");

        let response = self.http.get(url.clone()).query(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.path().to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%url, status = status.as_u16(), "backend returned error status");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: excerpt(&body),
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| ApiError::Json {
            message: e.to_string(),
            body: Some(excerpt(&body)),
        })
    }

    /// Fetch every stop.
    pub async fn get_stops(&self) -> Result<Vec<Stop>, ApiError> {
        let response: StopsResponse = self.get_json(&["stops"], &[]).await?;
        Ok(response.stops)
    }

    /// Fetch one page of journeys matching `query`.
    pub async fn get_journeys(&self, query: &JourneyQuery) -> Result<JourneyPage, ApiError> {
        self.get_json(&["journey"], &query.to_query_pairs()).await
    }

    /// Fetch a single journey.
    ///
    /// Returns [`ApiError::NotFound`] for unknown ids, including the
    /// `null` body some backend versions send instead of a 404, and for
    /// bodies that carry no journey id.
    pub async fn get_journey(&self, id: &str) -> Result<Journey, ApiError> {
        let not_found = || ApiError::NotFound(format!("journey {id}"));

        // Dot segments are dropped when the URL is built
        if matches!(id, "" | "." | "..") {
            return Err(not_found());
        }

        let journey: Option<Journey> = self.get_json(&["journey", id], &[]).await?;
        journey
            .filter(|j| !j.journey_id.is_empty())
            .ok_or_else(not_found)
    }

    /// Fetch the distinct operator names.
    pub async fn get_operator_types(&self) -> Result<Vec<String>, ApiError> {
        let response: TypesResponse = self.get_json(&["operators", "types"], &[]).await?;
        Ok(response.types)
    }

    /// Fetch the distinct bus types.
    pub async fn get_bus_types(&self) -> Result<Vec<String>, ApiError> {
        let response: TypesResponse = self.get_json(&["buses", "types"], &[]).await?;
        Ok(response.types)
    }

    /// Fetch schedules from the older listing endpoint.
    pub async fn get_schedules(&self, query: &ScheduleQuery) -> Result<SchedulePage, ApiError> {
        self.get_json(&["schedule"], &query.to_query_pairs()).await
    }
}

/// Keep at most [`BODY_EXCERPT_CHARS`] characters of a response body.
fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

impl BusApi for BusApiClient {
    async fn stops(&self) -> Result<Vec<Stop>, ApiError> {
        self.get_stops().await
    }

    async fn search_journeys(&self, query: &JourneyQuery) -> Result<JourneyPage, ApiError> {
        self.get_journeys(query).await
    }

    async fn journey(&self, id: &str) -> Result<Journey, ApiError> {
        self.get_journey(id).await
    }

    async fn operator_types(&self) -> Result<Vec<String>, ApiError> {
        self.get_operator_types().await
    }

    async fn bus_types(&self) -> Result<Vec<String>, ApiError> {
        self.get_bus_types().await
    }

    async fn search_schedules(&self, query: &ScheduleQuery) -> Result<SchedulePage, ApiError> {
        self.get_schedules(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = BusApiConfig::new("http://backend:8080/")
            .with_max_concurrent(10)
            .with_timeout(60);

        assert_eq!(config.base_url, "http://backend:8080");
        assert_eq!(config.max_concurrent, 10);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = BusApiConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn zero_concurrency_is_bumped() {
        let config = BusApiConfig::default().with_max_concurrent(0);
        assert_eq!(config.max_concurrent, 1);
    }

    #[test]
    fn client_creation() {
        let client = BusApiClient::new(BusApiConfig::default()).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:5000/");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = BusApiClient::new(BusApiConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn endpoint_segments_are_escaped() {
        let client = BusApiClient::new(BusApiConfig::default()).unwrap();

        let url = client.endpoint(&["journey", "../stops?limit=1"]).unwrap();
        assert_eq!(url.path(), "/journey/..%2Fstops%3Flimit=1");
        assert_eq!(url.query(), None);

        let url = client.endpoint(&["operators", "types"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/operators/types");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let config = BusApiConfig::new("http://backend.test/api/");
        let client = BusApiClient::new(config).unwrap();

        let url = client.endpoint(&["journey", "j-1"]).unwrap();
        assert_eq!(url.as_str(), "http://backend.test/api/journey/j-1");
    }

    #[tokio::test]
    async fn dot_segment_ids_are_not_found() {
        let config = BusApiConfig::new("http://127.0.0.1:9").with_timeout(2);
        let client = BusApiClient::new(config).unwrap();

        for id in ["", ".", ".."] {
            let err = client.get_journey(id).await.unwrap_err();
            assert!(err.is_not_found(), "{id:?} gave {err}");
        }
    }

    #[test]
    fn long_bodies_are_cut() {
        let body = "x".repeat(BODY_EXCERPT_CHARS * 2);
        assert_eq!(excerpt(&body).len(), BODY_EXCERPT_CHARS);
        assert_eq!(excerpt("short"), "short");
    }

    #[tokio::test]
    async fn unreachable_backend_is_http_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let config = BusApiConfig::new("http://127.0.0.1:9").with_timeout(2);
        let client = BusApiClient::new(config).unwrap();

        let err = client.get_stops().await.unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }
}
