// Client for the relay endpoints the search form talks to:
// GET /api/autocomplete and GET /api/search

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::offers::{FlightOffer, LocationSuggestion};
use crate::search::SearchCriteria;

pub const AUTOCOMPLETE_PATH: &str = "/api/autocomplete";
pub const SEARCH_PATH: &str = "/api/search";

// Ways a relay call can fail. Callers collapse all of them into "no data".
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Relay error: {status_code}")]
    ApiResponseError { status_code: u16 },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_ms: 30_000,
        }
    }
}

#[async_trait]
pub trait RelayClient: Send + Sync + 'static {
    // Location lookup for one field's current text
    async fn autocomplete(&self, keyword: &str) -> Result<Vec<LocationSuggestion>, RelayError>;

    // Flight offers for fully resolved criteria
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<FlightOffer>, RelayError>;
}

pub struct HttpRelayClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl HttpRelayClient {
    pub fn new(config: ClientConfig) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| RelayError::NetworkError(e.to_string()))?;

        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn map_transport_error(&self, error: reqwest::Error) -> RelayError {
        if error.is_timeout() {
            RelayError::Timeout(self.config.timeout_ms)
        } else {
            RelayError::NetworkError(error.to_string())
        }
    }

    async fn get_json<Q, T>(&self, path: &str, query: &Q) -> Result<T, RelayError>
    where
        Q: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::ApiResponseError {
                status_code: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        debug!("{} returned {} bytes", path, body.len());

        serde_json::from_str(&body).map_err(|e| RelayError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn autocomplete(&self, keyword: &str) -> Result<Vec<LocationSuggestion>, RelayError> {
        self.get_json(AUTOCOMPLETE_PATH, &[("keyword", keyword)])
            .await
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<FlightOffer>, RelayError> {
        self.get_json(SEARCH_PATH, criteria).await
    }
}
