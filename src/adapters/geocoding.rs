use crate::adapters::{build_http_client, DEFAULT_REQUEST_TIMEOUT};
use crate::domain::model::GeoCandidate;
use crate::domain::ports::Geocoder;
use crate::utils::error::{Result, Service, TrackerError};
use crate::utils::number::lenient_f64;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_GEOCODING_ENDPOINT: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_COUNTRY_CODE: &str = "US";

// 查無結果時 Open-Meteo 會整個省略 `results`
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(deserialize_with = "lenient_f64")]
    latitude: f64,
    #[serde(deserialize_with = "lenient_f64")]
    longitude: f64,
    name: Option<String>,
}

/// Postal code lookup restricted to a single country.
pub struct GeocodingClient {
    client: Client,
    endpoint: String,
    country_code: String,
}

impl GeocodingClient {
    pub fn new(endpoint: impl Into<String>, country_code: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, country_code, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        country_code: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            endpoint: endpoint.into(),
            country_code: country_code.into().to_uppercase(),
        })
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    fn upstream(message: impl std::fmt::Display) -> TrackerError {
        TrackerError::upstream(Service::Geocoding, message)
    }
}

#[async_trait]
impl Geocoder for GeocodingClient {
    async fn lookup(&self, postal_code: &str) -> Result<Vec<GeoCandidate>> {
        tracing::debug!(
            "Making geocoding request to: {} (postal code {}, country {})",
            self.endpoint,
            postal_code,
            self.country_code
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("name", postal_code),
                ("countryCode", self.country_code.as_str()),
                ("count", "1"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(Self::upstream)?;

        let status = response.status();
        tracing::debug!("Geocoding response status: {}", status);
        if !status.is_success() {
            return Err(Self::upstream(format!("HTTP {}", status)));
        }

        let body: SearchResponse = response.json().await.map_err(Self::upstream)?;

        Ok(body
            .results
            .into_iter()
            .map(|result| GeoCandidate {
                latitude: result.latitude,
                longitude: result.longitude,
                name: result.name,
            })
            .collect())
    }
}
