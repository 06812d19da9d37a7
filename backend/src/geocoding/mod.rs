//! Address resolution with provider fallback.
//!
//! Two providers are available: a regional one tuned for Korean address
//! formats ([`vworld`]) and a global one ([`nominatim`]). The resolver walks
//! an ordered chain of providers and stops at the first match:
//!
//! ```text
//!   hint = Primary, key set:   vworld (ROAD -> PARCEL) -> nominatim
//!   otherwise:                 nominatim
//! ```
//!
//! A transport or protocol failure from any provider is logged and the chain
//! moves on. When the chain is exhausted the caller gets
//! [`SkyError::AddressNotFound`] with one [`ProviderAttempt`] per provider.

pub mod nominatim;
pub mod vworld;

pub use nominatim::NominatimProvider;
pub use vworld::{VworldAddressType, VworldProvider};

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::api::LocalizationHint;
use crate::config::GeocodingSettings;
use crate::error::{ProviderAttempt, SkyError, SkyResult};

/// A located address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeMatch {
    pub latitude: f64,
    pub longitude: f64,
    /// Provider-normalized label for the place
    pub display_address: String,
    /// Name of the provider that produced the match
    pub provider: String,
}

impl GeocodeMatch {
    /// Build a match, rejecting coordinates outside the valid ranges.
    pub fn new(
        latitude: f64,
        longitude: f64,
        display_address: impl Into<String>,
        provider: impl Into<String>,
    ) -> Result<Self, GeocodingError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeocodingError::Parse(format!(
                "Latitude {} outside -90..=90",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeocodingError::Parse(format!(
                "Longitude {} outside -180..=180",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
            display_address: display_address.into(),
            provider: provider.into(),
        })
    }
}

/// Transport or protocol failure from a single provider.
#[derive(Debug, thiserror::Error)]
pub enum GeocodingError {
    /// Request timed out
    #[error("Timeout")]
    Timeout,
    /// Connection failed
    #[error("Connection error: {0}")]
    Connection(String),
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(String),
    /// Server returned an error status
    #[error("Server error (status {status}): {message}")]
    Status { status: u16, message: String },
    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),
    /// The provider answered but reported an error of its own
    #[error("Provider error: {0}")]
    Provider(String),
}

impl From<reqwest::Error> for GeocodingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeocodingError::Timeout
        } else if err.is_connect() {
            GeocodingError::Connection(err.to_string())
        } else if err.is_decode() {
            GeocodingError::Parse(err.to_string())
        } else {
            GeocodingError::Http(err.to_string())
        }
    }
}

/// Result of asking one provider about one address.
#[derive(Debug)]
pub enum ProviderOutcome {
    Match(GeocodeMatch),
    NotFound,
    TransportError(GeocodingError),
}

/// A geocoding backend that can be placed in the fallback chain.
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Short stable name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Make one best-effort attempt to locate `address`.
    async fn try_resolve(&self, address: &str) -> ProviderOutcome;
}

/// Build the shared HTTP client. The timeout covers the whole request.
pub fn build_http_client(settings: &GeocodingSettings) -> Result<reqwest::Client, GeocodingError> {
    reqwest::Client::builder()
        .timeout(settings.timeout())
        .user_agent(settings.user_agent.clone())
        .build()
        .map_err(|e| GeocodingError::Http(format!("Failed to build HTTP client: {}", e)))
}

/// Read a coordinate that providers send either as a JSON number or a string.
pub(crate) fn coordinate_from_value(value: &serde_json::Value) -> Option<f64> {
    let parsed: Option<f64> = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Ordered provider chain turning free text into coordinates.
#[derive(Clone)]
pub struct AddressResolver {
    regional: Option<Arc<dyn GeocodingProvider>>,
    global: Arc<dyn GeocodingProvider>,
}

impl AddressResolver {
    pub fn new(
        regional: Option<Arc<dyn GeocodingProvider>>,
        global: Arc<dyn GeocodingProvider>,
    ) -> Self {
        Self { regional, global }
    }

    /// Wire the real providers. The regional provider is only created when a key is configured.
    pub fn from_settings(settings: &GeocodingSettings) -> SkyResult<Self> {
        let client = build_http_client(settings)
            .map_err(|e| SkyError::Configuration(e.to_string()))?;

        let regional = settings.regional_key().map(|key| {
            Arc::new(VworldProvider::new(
                client.clone(),
                settings.vworld_url.clone(),
                key.to_string(),
            )) as Arc<dyn GeocodingProvider>
        });
        if regional.is_none() {
            info!("No regional geocoder key configured; using the global provider only");
        }

        let global = Arc::new(NominatimProvider::new(client, settings.nominatim_url.clone()));
        Ok(Self::new(regional, global))
    }

    /// Providers to try for a hint, in order.
    pub fn chain_for(&self, hint: LocalizationHint) -> Vec<&dyn GeocodingProvider> {
        let mut chain: Vec<&dyn GeocodingProvider> = Vec::with_capacity(2);
        if hint == LocalizationHint::Primary {
            if let Some(regional) = &self.regional {
                chain.push(regional.as_ref());
            }
        }
        chain.push(self.global.as_ref());
        chain
    }

    /// Resolve an address, falling through the chain on not-found or failure.
    pub async fn resolve(&self, address: &str, hint: LocalizationHint) -> SkyResult<GeocodeMatch> {
        if address.trim().is_empty() {
            return Err(SkyError::address_not_found(address, Vec::new()));
        }

        let mut attempts = Vec::new();
        for provider in self.chain_for(hint) {
            match provider.try_resolve(address).await {
                ProviderOutcome::Match(found) => {
                    debug!(
                        "{} resolved '{}' to ({:.5}, {:.5})",
                        provider.name(),
                        address,
                        found.latitude,
                        found.longitude
                    );
                    return Ok(found);
                }
                ProviderOutcome::NotFound => {
                    debug!("{} found no match for '{}'", provider.name(), address);
                    attempts.push(ProviderAttempt::new(provider.name(), "not_found"));
                }
                ProviderOutcome::TransportError(err) => {
                    warn!(
                        "{} failed for '{}', falling through: {}",
                        provider.name(),
                        address,
                        err
                    );
                    attempts.push(ProviderAttempt::new(provider.name(), format!("error: {}", err)));
                }
            }
        }

        Err(SkyError::address_not_found(address, attempts))
    }
}
