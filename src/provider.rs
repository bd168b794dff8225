// Flight-data provider behind the relay (Amadeus self-service API).
// Records are passed through as raw JSON; the relay doesn't reshape them.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub const TOKEN_PATH: &str = "/v1/security/oauth2/token";
pub const LOCATIONS_PATH: &str = "/v1/reference-data/locations";
pub const FLIGHT_OFFERS_PATH: &str = "/v2/shopping/flight-offers";

// Location lookups are restricted to cities
pub const LOCATION_SUB_TYPE: &str = "CITY";

// Refresh the access token this long before the provider says it expires
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 30;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Provider error: {status_code} - {message}")]
    ApiResponseError { status_code: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Query of `GET /api/search` as received by the relay.
///
/// Every field defaults to empty so a partial query still reaches the
/// provider, which then rejects it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlightOffersQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub return_date: Option<String>,
    pub adults: String,
    pub children: String,
    pub infants: String,
    pub travel_class: String,
}

impl FlightOffersQuery {
    // Provider parameter names; returnDate only when there is one
    pub fn provider_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = vec![
            ("originLocationCode", self.origin.as_str()),
            ("destinationLocationCode", self.destination.as_str()),
            ("departureDate", self.departure_date.as_str()),
            ("adults", self.adults.as_str()),
            ("children", self.children.as_str()),
            ("infants", self.infants.as_str()),
            ("travelClass", self.travel_class.as_str()),
        ];
        if let Some(return_date) = self.return_date.as_deref().filter(|d| !d.is_empty()) {
            params.push(("returnDate", return_date));
        }
        params
    }
}

#[async_trait]
pub trait FlightDataProvider: Send + Sync + 'static {
    async fn locations(&self, keyword: &str) -> Result<Vec<Value>, ProviderError>;

    async fn flight_offers(&self, query: &FlightOffersQuery) -> Result<Vec<Value>, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope {
    data: Vec<Value>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

pub struct AmadeusProvider {
    base_url: String,
    client_id: String,
    client_secret: String,
    timeout_ms: u64,
    http: reqwest::Client,
    token: Mutex<Option<AccessToken>>,
}

impl AmadeusProvider {
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        Ok(Self {
            base_url: config.provider_base_url.trim_end_matches('/').to_string(),
            client_id: config.api_key.clone(),
            client_secret: config.api_secret.clone(),
            timeout_ms: config.request_timeout_ms,
            http,
            token: Mutex::new(None),
        })
    }

    fn map_transport_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout(self.timeout_ms)
        } else {
            ProviderError::NetworkError(error.to_string())
        }
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        let cached = self
            .token
            .lock()
            .as_ref()
            .filter(|token| token.expires_at > Utc::now())
            .map(|token| token.value.clone());
        if let Some(token) = cached {
            return Ok(token);
        }

        debug!("Requesting provider access token");
        let response = self
            .http
            .post(format!("{}{}", self.base_url, TOKEN_PATH))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthError(format!("{}: {}", status.as_u16(), body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let lifetime = (token.expires_in - TOKEN_EXPIRY_MARGIN_SECS).max(0);
        *self.token.lock() = Some(AccessToken {
            value: token.access_token.clone(),
            expires_at: Utc::now() + ChronoDuration::seconds(lifetime),
        });

        Ok(token.access_token)
    }

    async fn get_data(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<Value>, ProviderError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .query(params)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            return Err(ProviderError::ApiResponseError {
                status_code: status.as_u16(),
                message: body,
            });
        }

        let envelope: DataEnvelope = serde_json::from_str(&body)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl FlightDataProvider for AmadeusProvider {
    async fn locations(&self, keyword: &str) -> Result<Vec<Value>, ProviderError> {
        self.get_data(
            LOCATIONS_PATH,
            &[("keyword", keyword), ("subType", LOCATION_SUB_TYPE)],
        )
        .await
    }

    async fn flight_offers(&self, query: &FlightOffersQuery) -> Result<Vec<Value>, ProviderError> {
        self.get_data(FLIGHT_OFFERS_PATH, &query.provider_params())
            .await
    }
}
