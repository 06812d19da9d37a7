//! Data Transfer Objects for the HTTP API.
//!
//! The snapshot and narrative types already derive Serialize/Deserialize and
//! are re-exported as-is.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::api::{ConstellationPosition, SkySnapshot, StarObservation};
pub use crate::services::NarrativeBrief;

/// Request body for a sky computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkyRequest {
    /// Free-text place name
    pub address: String,
    /// Local wall-clock time, `YYYY-MM-DD HH:MM`
    pub when: String,
    /// UI language code; "ko" selects the regional geocoder
    #[serde(default)]
    pub lang: Option<String>,
    /// Overrides the configured magnitude limit
    #[serde(default)]
    pub magnitude_limit: Option<f64>,
}

/// Response for a sky computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkyResponse {
    /// Correlates the response with server logs
    pub request_id: Uuid,
    pub snapshot: SkySnapshot,
    pub narrative: NarrativeBrief,
}

/// Loaded catalog summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub stars: usize,
    pub segments: usize,
    /// SHA-256 of the loaded records
    pub checksum: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    pub catalog: CatalogSummary,
}
