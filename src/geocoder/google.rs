use crate::geocoder::core::{GeocodeReply, GeocoderStatus};
use crate::geocoder::GeocoderProvider;
use crate::utils::maptypes::GeoPosition;
use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

const GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com";

#[derive(Clone, Debug)]
pub struct GoogleGeocoderProvider {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GoogleGeocoderProvider {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            // One client for the provider's lifetime; requests reuse it
            client: Client::new(),
            api_key,
            endpoint,
        }
    }

    pub fn from_env() -> Result<Self> {
        if let Ok(api_key) = env::var("GOOGLE_MAPS_API_KEY") {
            return Ok(Self::new(GEOCODE_ENDPOINT.to_string(), api_key));
        }
        Err(anyhow!("No Google Maps API key provided"))
    }

    async fn fetch(&self, input: &str) -> Result<GeocodeReply> {
        let res = self
            .client
            .get(format!("{}/maps/api/geocode/json", self.endpoint))
            .query(&[("key", self.api_key.as_str()), ("address", input)])
            .send()
            .await?
            .error_for_status()?;

        let body = res.json::<GoogleGeocoderResponse>().await?;
        Ok(body.into())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GoogleGeocoderPosition {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
struct GoogleGeocoderGeometry {
    location: GoogleGeocoderPosition,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
struct GoogleGeocoderResult {
    geometry: GoogleGeocoderGeometry,
}

#[derive(Deserialize, Clone, Debug)]
struct GoogleGeocoderResponse {
    status: String,
    #[serde(default)]
    results: Vec<GoogleGeocoderResult>,
}

#[async_trait::async_trait]
impl GeocoderProvider for GoogleGeocoderProvider {
    async fn geocode(&self, input: &str) -> GeocodeReply {
        match self.fetch(input).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Geocode request failed: {e}");
                GeocodeReply::failed(GeocoderStatus::Error)
            }
        }
    }
}

impl From<GoogleGeocoderResponse> for GeocodeReply {
    fn from(value: GoogleGeocoderResponse) -> Self {
        Self {
            status: value.status.as_str().into(),
            results: value
                .results
                .iter()
                .map(|result| (&result.geometry.location).into())
                .collect(),
        }
    }
}

impl From<&GoogleGeocoderPosition> for GeoPosition {
    fn from(value: &GoogleGeocoderPosition) -> Self {
        Self {
            latitude: value.lat,
            longitude: value.lng,
        }
    }
}
