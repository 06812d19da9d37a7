//! Global geocoder backed by an OpenStreetMap Nominatim search endpoint.

use async_trait::async_trait;
use serde::Deserialize;

use super::{coordinate_from_value, GeocodeMatch, GeocodingError, GeocodingProvider, ProviderOutcome};

const PROVIDER_NAME: &str = "nominatim";

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: serde_json::Value,
    lon: serde_json::Value,
    #[serde(default)]
    display_name: Option<String>,
}

/// Geocoder for the Nominatim `search` endpoint.
///
/// The User-Agent required by the public instance is set on the shared client.
pub struct NominatimProvider {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimProvider {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub async fn lookup(&self, address: &str) -> Result<Option<GeocodeMatch>, GeocodingError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocodingError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        parse_response(&body, address)
    }
}

#[async_trait]
impl GeocodingProvider for NominatimProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn try_resolve(&self, address: &str) -> ProviderOutcome {
        match self.lookup(address).await {
            Ok(Some(found)) => ProviderOutcome::Match(found),
            Ok(None) => ProviderOutcome::NotFound,
            Err(err) => ProviderOutcome::TransportError(err),
        }
    }
}

/// Interpret a search response body. An empty array means no match.
pub fn parse_response(body: &str, address: &str) -> Result<Option<GeocodeMatch>, GeocodingError> {
    let places: Vec<NominatimPlace> = serde_json::from_str(body)
        .map_err(|e| GeocodingError::Parse(format!("Invalid Nominatim response: {}", e)))?;

    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };

    let latitude = coordinate_from_value(&place.lat)
        .ok_or_else(|| GeocodingError::Parse(format!("Invalid latitude {}", place.lat)))?;
    let longitude = coordinate_from_value(&place.lon)
        .ok_or_else(|| GeocodingError::Parse(format!("Invalid longitude {}", place.lon)))?;
    let display_address = place
        .display_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| address.to_string());

    GeocodeMatch::new(latitude, longitude, display_address, PROVIDER_NAME).map(Some)
}
