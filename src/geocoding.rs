use reqwest::blocking::Client;
use reqwest::header::ACCEPT_LANGUAGE;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::settings::Settings;

/// Failures of the reverse-geocoding call itself. "No address" is not one of
/// them; it is the `Ok(None)` outcome.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("reverse geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("reverse geocoding service rejected the subscription key (HTTP {status})")]
    Authentication { status: StatusCode },

    #[error("reverse geocoding service returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed reverse geocoding response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

/// Resolves a decimal coordinate pair to a formatted address.
pub trait ReverseGeocoder {
    fn resolve_address(&self, longitude: f64, latitude: f64)
        -> Result<Option<String>, ServiceError>;
}

#[derive(Debug, Deserialize)]
pub struct ReverseGeocodeResponse {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Option<FeatureProperties>,
}

#[derive(Debug, Deserialize)]
pub struct FeatureProperties {
    #[serde(default)]
    pub address: Option<AddressProperties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressProperties {
    #[serde(default)]
    pub formatted_address: Option<String>,
}

impl ReverseGeocodeResponse {
    /// Formatted address of the first feature.
    pub fn into_formatted_address(self) -> Option<String> {
        let feature = self.features.into_iter().next()?;
        let address = feature.properties?.address?;
        address.formatted_address
    }
}

/// Azure Maps Search `reverseGeocode` client
pub struct AzureMapsClient {
    client: Client,
    url: String,
    api_version: String,
    subscription_key: String,
    language: Option<String>,
}

impl AzureMapsClient {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let subscription_key = settings.require_maps_key()?.to_string();
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: format!("{}/reverseGeocode", settings.endpoint.trim_end_matches('/')),
            api_version: settings.api_version.clone(),
            subscription_key,
            language: settings.language.clone(),
        })
    }
}

impl ReverseGeocoder for AzureMapsClient {
    fn resolve_address(
        &self,
        longitude: f64,
        latitude: f64,
    ) -> Result<Option<String>, ServiceError> {
        let coordinates = format!("{},{}", longitude, latitude);
        info!("Reverse geocoding {}", coordinates);

        let mut request = self
            .client
            .get(&self.url)
            .query(&[
                ("api-version", self.api_version.as_str()),
                ("coordinates", coordinates.as_str()),
            ])
            .header("subscription-key", &self.subscription_key);
        if let Some(ref language) = self.language {
            request = request.header(ACCEPT_LANGUAGE, language);
        }

        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;
        debug!("Reverse geocoding answered HTTP {} ({} bytes)", status, body.len());

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ServiceError::Authentication { status });
        }
        if !status.is_success() {
            return Err(ServiceError::Status { status, body });
        }

        parse_address(&body)
    }
}

/// Parses a reverse geocoding body and picks the first formatted address.
pub fn parse_address(body: &str) -> Result<Option<String>, ServiceError> {
    let response: ReverseGeocodeResponse = serde_json::from_str(body)?;
    Ok(response.into_formatted_address())
}
