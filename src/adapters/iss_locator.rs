use crate::adapters::{build_http_client, DEFAULT_REQUEST_TIMEOUT};
use crate::domain::model::{Coordinate, IssPosition};
use crate::domain::ports::PositionSource;
use crate::utils::error::{Result, Service, TrackerError};
use crate::utils::number::lenient_f64;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ISS_ENDPOINT: &str = "http://api.open-notify.org/iss-now.json";

#[derive(Debug, Deserialize)]
struct IssNowResponse {
    message: Option<String>,
    timestamp: Option<i64>,
    iss_position: Option<IssPositionPayload>,
}

#[derive(Debug, Deserialize)]
struct IssPositionPayload {
    #[serde(deserialize_with = "lenient_f64")]
    latitude: f64,
    #[serde(deserialize_with = "lenient_f64")]
    longitude: f64,
}

/// Open Notify `iss-now.json` 用戶端。單次嘗試，不重試。
pub struct IssLocator {
    client: Client,
    endpoint: String,
}

impl IssLocator {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }

    fn upstream(message: impl std::fmt::Display) -> TrackerError {
        TrackerError::upstream(Service::IssPosition, message)
    }
}

#[async_trait]
impl PositionSource for IssLocator {
    async fn current_position(&self) -> Result<IssPosition> {
        tracing::debug!("Making ISS position request to: {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(Self::upstream)?;

        let status = response.status();
        tracing::debug!("ISS position response status: {}", status);
        if !status.is_success() {
            return Err(Self::upstream(format!("HTTP {}", status)));
        }

        let body: IssNowResponse = response.json().await.map_err(Self::upstream)?;

        if let Some(message) = body.message.as_deref() {
            if message != "success" {
                return Err(Self::upstream(format!(
                    "API returned {} status",
                    message
                )));
            }
        }

        let payload = body
            .iss_position
            .ok_or_else(|| Self::upstream("response has no iss_position"))?;

        let coordinate = Coordinate::new(payload.latitude, payload.longitude).map_err(|_| {
            Self::upstream(format!(
                "position out of range ({}, {})",
                payload.latitude, payload.longitude
            ))
        })?;

        let timestamp = body
            .timestamp
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

        Ok(IssPosition {
            coordinate,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn locator_for(server: &MockServer) -> IssLocator {
        IssLocator::new(server.url("/iss-now.json")).unwrap()
    }

    fn assert_upstream(result: Result<IssPosition>) {
        assert!(matches!(
            result,
            Err(TrackerError::UpstreamError {
                service: Service::IssPosition,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_parses_string_coordinates_and_timestamp() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/iss-now.json");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(serde_json::json!({
                        "message": "success",
                        "timestamp": 1700000000,
                        "iss_position": {"latitude": "10.0", "longitude": "20.0"}
                    }));
            })
            .await;

        let position = locator_for(&server).current_position().await.unwrap();

        api_mock.assert_async().await;
        assert_eq!(position.coordinate.latitude(), 10.0);
        assert_eq!(position.coordinate.longitude(), 20.0);
        assert_eq!(position.timestamp.unwrap().timestamp(), 1_700_000_000);
    }

    #[tokio::test]
    async fn test_accepts_numeric_fields_without_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/iss-now.json");
                then.status(200).json_body(serde_json::json!({
                    "iss_position": {"latitude": -51.6, "longitude": 122.25}
                }));
            })
            .await;

        let position = locator_for(&server).current_position().await.unwrap();

        assert_eq!(position.coordinate.latitude(), -51.6);
        assert_eq!(position.coordinate.longitude(), 122.25);
        assert!(position.timestamp.is_none());
    }

    #[tokio::test]
    async fn test_failure_status_field() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/iss-now.json");
                then.status(200)
                    .json_body(serde_json::json!({"message": "failure"}));
            })
            .await;

        let err = locator_for(&server).current_position().await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "ISS position service request failed: API returned failure status"
        );
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/iss-now.json");
                then.status(503);
            })
            .await;

        assert_upstream(locator_for(&server).current_position().await);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/iss-now.json");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        assert_upstream(locator_for(&server).current_position().await);
    }

    #[tokio::test]
    async fn test_non_numeric_coordinates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/iss-now.json");
                then.status(200).json_body(serde_json::json!({
                    "message": "success",
                    "iss_position": {"latitude": "north", "longitude": "20.0"}
                }));
            })
            .await;

        assert_upstream(locator_for(&server).current_position().await);
    }

    #[tokio::test]
    async fn test_out_of_range_position_is_upstream_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/iss-now.json");
                then.status(200).json_body(serde_json::json!({
                    "message": "success",
                    "iss_position": {"latitude": "123.0", "longitude": "20.0"}
                }));
            })
            .await;

        assert_upstream(locator_for(&server).current_position().await);
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // nothing listens on port 9 (discard) in the test environment
        let locator =
            IssLocator::with_timeout("http://127.0.0.1:9/iss-now.json", Duration::from_secs(2))
                .unwrap();

        assert_upstream(locator.current_position().await);
    }
}
