//! Error types for the sky computation engine.
//!
//! Only two failures are meant for end users: the address could not be
//! located, or no timezone covers the resolved coordinates. Both mean an
//! observer frame cannot be built. Regional geocoder failures never reach
//! this type; they are recorded as [`ProviderAttempt`]s and the chain moves on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result type for engine operations
pub type SkyResult<T> = Result<T, SkyError>;

/// What a single geocoding provider did for one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAttempt {
    /// Provider name (e.g. "vworld", "nominatim")
    pub provider: String,
    /// Short outcome ("not_found", "error: Timeout", ...)
    pub outcome: String,
}

impl ProviderAttempt {
    pub fn new(provider: impl Into<String>, outcome: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            outcome: outcome.into(),
        }
    }
}

impl fmt::Display for ProviderAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.provider, self.outcome)
    }
}

fn join_attempts(attempts: &[ProviderAttempt]) -> String {
    if attempts.is_empty() {
        return "none".to_string();
    }
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error type for engine operations
#[derive(Debug, thiserror::Error)]
pub enum SkyError {
    /// Every geocoding path was exhausted without a match.
    #[error("Address not found: {address} [tried: {}]", join_attempts(.attempts))]
    AddressNotFound {
        address: String,
        attempts: Vec<ProviderAttempt>,
    },

    /// Coordinates resolved but no timezone polygon covers them.
    #[error("Timezone not found: lat={latitude}, lng={longitude}")]
    TimezoneResolution { latitude: f64, longitude: f64 },

    /// The local timestamp is not `YYYY-MM-DD HH:MM`.
    #[error("Invalid local time '{value}': expected YYYY-MM-DD HH:MM")]
    InvalidLocalTime { value: String },

    /// Catalog or line-table data could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Configuration or initialization error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SkyError {
    pub fn address_not_found(address: impl Into<String>, attempts: Vec<ProviderAttempt>) -> Self {
        Self::AddressNotFound {
            address: address.into(),
            attempts,
        }
    }

    /// True for failures that should be shown to the person who typed the query.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::AddressNotFound { .. }
                | Self::TimezoneResolution { .. }
                | Self::InvalidLocalTime { .. }
        )
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AddressNotFound { .. } => "ADDRESS_NOT_FOUND",
            Self::TimezoneResolution { .. } => "TIMEZONE_NOT_FOUND",
            Self::InvalidLocalTime { .. } => "INVALID_LOCAL_TIME",
            Self::Catalog(_) => "CATALOG_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}
