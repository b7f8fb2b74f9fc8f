//! Building insights HTTP client.

use crate::config::Config;
use crate::error::InsightsError;
use crate::payload::BuildingInsightsPayload;
use crate::provider::{InsightsProvider, ProviderResponse};
use reqwest::{Client, StatusCode};
use solar_core::Coordinate;
use std::time::Duration;

/// Longest slice of an error body kept in a transport failure message.
const ERROR_BODY_PREVIEW: usize = 200;

/// HTTP client for the `buildingInsights:findClosest` endpoint.
pub struct SolarApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    required_quality: String,
    request_id: Option<String>,
}

impl SolarApiClient {
    pub fn new(config: &Config) -> Result<Self, InsightsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_s.max(1)))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            required_quality: config.required_quality.clone(),
            request_id: None,
        })
    }

    pub fn set_request_id(&mut self, request_id: Option<String>) {
        self.request_id = request_id
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
    }

    fn apply_request_id(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.request_id.as_deref() {
            Some(value) => request.header("X-Request-ID", value),
            None => request,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/buildingInsights:findClosest", self.base_url)
    }

    async fn fetch(&self, location: Coordinate) -> Result<(StatusCode, String), reqwest::Error> {
        let latitude = location.latitude.to_string();
        let longitude = location.longitude.to_string();
        let request = self.client.get(self.endpoint()).query(&[
            ("location.latitude", latitude.as_str()),
            ("location.longitude", longitude.as_str()),
            ("requiredQuality", self.required_quality.as_str()),
            ("key", self.api_key.as_str()),
        ]);
        let response = self.apply_request_id(request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

impl InsightsProvider for SolarApiClient {
    async fn building_insights(&self, location: Coordinate) -> ProviderResponse {
        match self.fetch(location).await {
            Ok((status, body)) => {
                let outcome = classify_response(status, &body);
                match &outcome {
                    ProviderResponse::Success(_) => {
                        tracing::debug!(%status, "Building insights received")
                    }
                    ProviderResponse::NotFound => tracing::info!(
                        lat = location.latitude,
                        lng = location.longitude,
                        "No building insights coverage"
                    ),
                    ProviderResponse::TransportFailure(reason) => {
                        tracing::warn!(%status, "Building insights request failed: {}", reason)
                    }
                }
                outcome
            }
            Err(err) => {
                tracing::warn!("Building insights request error: {}", err);
                ProviderResponse::TransportFailure(err.to_string())
            }
        }
    }
}

/// Map an HTTP status and body to a provider outcome.
///
/// 404 is the provider's "no building at this location" signal. Every other
/// non-success status, and any success body that fails to decode, is a
/// transport failure.
pub fn classify_response(status: StatusCode, body: &str) -> ProviderResponse {
    if status == StatusCode::NOT_FOUND {
        return ProviderResponse::NotFound;
    }
    if !status.is_success() {
        let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
        return ProviderResponse::TransportFailure(format!("HTTP {}: {}", status, preview));
    }
    match serde_json::from_str::<BuildingInsightsPayload>(body) {
        Ok(payload) => ProviderResponse::Success(Box::new(payload)),
        Err(err) => {
            ProviderResponse::TransportFailure(format!("undecodable building insights: {}", err))
        }
    }
}
