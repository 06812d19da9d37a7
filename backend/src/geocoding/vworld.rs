//! Regional geocoder backed by the VWorld address API.
//!
//! Korean addresses come in two forms: road-name (`ROAD`) and land-lot
//! (`PARCEL`). The provider tries the road form first and retries once with
//! the land-lot form when the first lookup finds nothing.

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use super::{coordinate_from_value, GeocodeMatch, GeocodingError, GeocodingProvider, ProviderOutcome};

const PROVIDER_NAME: &str = "vworld";

/// Address form sent in the `type` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VworldAddressType {
    Road,
    Parcel,
}

impl VworldAddressType {
    pub fn as_param(&self) -> &'static str {
        match self {
            VworldAddressType::Road => "ROAD",
            VworldAddressType::Parcel => "PARCEL",
        }
    }
}

#[derive(Debug, Deserialize)]
struct VworldEnvelope {
    response: VworldResponse,
}

#[derive(Debug, Deserialize)]
struct VworldResponse {
    status: String,
    #[serde(default)]
    result: Option<VworldResult>,
    #[serde(default)]
    refined: Option<VworldRefined>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct VworldResult {
    point: VworldPoint,
}

/// `x` is longitude and `y` is latitude, usually sent as strings
#[derive(Debug, Deserialize)]
struct VworldPoint {
    x: serde_json::Value,
    y: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct VworldRefined {
    #[serde(default)]
    text: Option<String>,
}

/// Geocoder for the VWorld `getCoord` endpoint.
pub struct VworldProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl VworldProvider {
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// One `getCoord` request for a single address form.
    pub async fn lookup(
        &self,
        address: &str,
        address_type: VworldAddressType,
    ) -> Result<Option<GeocodeMatch>, GeocodingError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("service", "address"),
                ("request", "getCoord"),
                ("version", "2.0"),
                ("crs", "EPSG:4326"),
                ("format", "json"),
                ("type", address_type.as_param()),
                ("address", address),
                ("key", self.api_key.as_str()),
            ])
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
impl GeocodingProvider for VworldProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn try_resolve(&self, address: &str) -> ProviderOutcome {
        for address_type in [VworldAddressType::Road, VworldAddressType::Parcel] {
            match self.lookup(address, address_type).await {
                Ok(Some(found)) => return ProviderOutcome::Match(found),
                Ok(None) => {
                    debug!("vworld {} lookup found nothing", address_type.as_param());
                }
                Err(err) => return ProviderOutcome::TransportError(err),
            }
        }
        ProviderOutcome::NotFound
    }
}

/// Interpret a `getCoord` response body.
///
/// `OK` yields a match, `NOT_FOUND` yields `None`, any other status is a
/// provider error. The display address falls back to the query text when the
/// response carries no refined address.
pub fn parse_response(body: &str, address: &str) -> Result<Option<GeocodeMatch>, GeocodingError> {
    let envelope: VworldEnvelope = serde_json::from_str(body)
        .map_err(|e| GeocodingError::Parse(format!("Invalid VWorld response: {}", e)))?;
    let response = envelope.response;

    match response.status.as_str() {
        "OK" => {
            let point = response
                .result
                .map(|r| r.point)
                .ok_or_else(|| GeocodingError::Parse("VWorld response has no result point".to_string()))?;
            let longitude = coordinate_from_value(&point.x)
                .ok_or_else(|| GeocodingError::Parse(format!("Invalid longitude {}", point.x)))?;
            let latitude = coordinate_from_value(&point.y)
                .ok_or_else(|| GeocodingError::Parse(format!("Invalid latitude {}", point.y)))?;
            let display_address = response
                .refined
                .and_then(|r| r.text)
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| address.to_string());

            GeocodeMatch::new(latitude, longitude, display_address, PROVIDER_NAME).map(Some)
        }
        "NOT_FOUND" => Ok(None),
        other => {
            let detail = response
                .error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no detail".to_string());
            Err(GeocodingError::Provider(format!("status {}: {}", other, detail)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BODY: &str = r#"{
        "response": {
            "service": {"name": "address", "version": "2.0", "operation": "getCoord"},
            "status": "OK",
            "input": {"type": "ROAD", "address": "부산광역시 부산진구 가야대로 772"},
            "refined": {"text": "부산광역시 부산진구 가야대로 772 (가야동)"},
            "result": {"crs": "EPSG:4326", "point": {"x": "129.0403", "y": "35.1552"}}
        }
    }"#;

    #[test]
    fn test_parse_ok_response() {
        let found = parse_response(OK_BODY, "부산광역시 부산진구 가야대로 772")
            .unwrap()
            .unwrap();

        assert!((found.latitude - 35.1552).abs() < 1e-9);
        assert!((found.longitude - 129.0403).abs() < 1e-9);
        assert_eq!(found.display_address, "부산광역시 부산진구 가야대로 772 (가야동)");
        assert_eq!(found.provider, "vworld");
    }

    #[test]
    fn test_parse_not_found() {
        let body = r#"{"response": {"status": "NOT_FOUND"}}"#;
        assert!(parse_response(body, "nowhere").unwrap().is_none());
    }

    #[test]
    fn test_parse_error_status() {
        let body = r#"{"response": {"status": "ERROR", "error": {"code": "INVALID_KEY", "text": "bad key"}}}"#;
        let err = parse_response(body, "x").unwrap_err();
        match err {
            GeocodingError::Provider(msg) => assert!(msg.contains("INVALID_KEY")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_refined_uses_query_text() {
        let body = r#"{"response": {"status": "OK", "result": {"point": {"x": 127.0, "y": 37.5}}}}"#;
        let found = parse_response(body, "서울").unwrap().unwrap();
        assert_eq!(found.display_address, "서울");
        assert_eq!(found.latitude, 37.5);
    }

    #[test]
    fn test_malformed_bodies_are_parse_errors() {
        assert!(matches!(parse_response("<html>", "x"), Err(GeocodingError::Parse(_))));

        let no_point = r#"{"response": {"status": "OK"}}"#;
        assert!(matches!(parse_response(no_point, "x"), Err(GeocodingError::Parse(_))));

        let bad_coord = r#"{"response": {"status": "OK", "result": {"point": {"x": "east", "y": "35"}}}}"#;
        assert!(matches!(parse_response(bad_coord, "x"), Err(GeocodingError::Parse(_))));
    }

    #[test]
    fn test_address_type_params() {
        assert_eq!(VworldAddressType::Road.as_param(), "ROAD");
        assert_eq!(VworldAddressType::Parcel.as_param(), "PARCEL");
    }
}
