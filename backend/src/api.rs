//! Public API surface for the sky computation engine.
//!
//! This file consolidates the data model shared by the engine stages and the
//! HTTP layer. All types derive Serialize/Deserialize for JSON serialization;
//! angular quantities are `qtty::Degrees` and serialize as bare numbers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id_type!(u32, HipId);

/// Raw user input. Not yet validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuery {
    /// Free-text place name in any language
    pub address: String,
    /// Local wall-clock time, `YYYY-MM-DD HH:MM`
    pub local_date_time: String,
}

impl RawQuery {
    pub fn new(address: impl Into<String>, local_date_time: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            local_date_time: local_date_time.into(),
        }
    }
}

/// Which geocoding strategy the caller's locale calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocalizationHint {
    /// The regional provider's locale; regional lookup is tried first.
    Primary,
    /// Anything else; go straight to the global provider.
    #[default]
    Fallback,
}

impl LocalizationHint {
    /// Map a UI language code to a hint. Only Korean selects the regional path.
    pub fn from_lang(lang: &str) -> Self {
        if lang.trim().eq_ignore_ascii_case("ko") {
            Self::Primary
        } else {
            Self::Fallback
        }
    }
}

/// Resolved observer frame. Input to every sky computation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObserverContext {
    /// Latitude in decimal degrees (-90 to 90)
    pub latitude: qtty::Degrees,
    /// Longitude in decimal degrees, east positive (-180 to 180)
    pub longitude: qtty::Degrees,
    pub instant_utc: DateTime<Utc>,
    /// Normalized address returned by the geocoder (for display)
    pub display_address: String,
}

impl ObserverContext {
    pub fn new(
        latitude: f64,
        longitude: f64,
        instant_utc: DateTime<Utc>,
        display_address: impl Into<String>,
    ) -> Self {
        Self {
            latitude: qtty::Degrees::new(latitude),
            longitude: qtty::Degrees::new(longitude),
            instant_utc,
            display_address: display_address.into(),
        }
    }
}

/// One record of the static star catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStar {
    pub catalog_id: HipId,
    pub ra_deg: qtty::Degrees,
    pub dec_deg: qtty::Degrees,
    /// Apparent visual magnitude
    pub magnitude: f64,
}

impl CatalogStar {
    pub fn new(catalog_id: u32, ra_deg: f64, dec_deg: f64, magnitude: f64) -> Self {
        Self {
            catalog_id: HipId::new(catalog_id),
            ra_deg: qtty::Degrees::new(ra_deg),
            dec_deg: qtty::Degrees::new(dec_deg),
            magnitude,
        }
    }

    /// All numeric fields are finite and the declination is physical.
    pub fn is_well_formed(&self) -> bool {
        self.ra_deg.value().is_finite()
            && self.dec_deg.value().is_finite()
            && self.magnitude.is_finite()
            && (-90.0..=90.0).contains(&self.dec_deg.value())
    }
}

/// Celestial coordinates plus plotting attributes for a single star at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarObservation {
    pub catalog_id: HipId,
    pub ra_deg: qtty::Degrees,
    pub dec_deg: qtty::Degrees,
    pub magnitude: f64,
    /// Stereographic x; the horizon is the unit circle
    pub x: f64,
    /// Stereographic y; north is +y
    pub y: f64,
    /// 0 = N, 90 = E, always in [0, 360)
    pub azimuth_deg: qtty::Degrees,
    pub altitude_deg: qtty::Degrees,
}

impl StarObservation {
    pub fn is_above_horizon(&self) -> bool {
        self.altitude_deg.value() >= 0.0
    }
}

/// A single constellation line segment between two catalog stars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstellationSegment {
    pub from_star: HipId,
    pub to_star: HipId,
    /// IAU abbreviation ("Ori", "UMa", ...)
    pub code: String,
}

impl ConstellationSegment {
    pub fn new(from_star: u32, to_star: u32, code: impl Into<String>) -> Self {
        Self {
            from_star: HipId::new(from_star),
            to_star: HipId::new(to_star),
            code: code.into(),
        }
    }
}

/// Representative sky position for a single constellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstellationPosition {
    pub code: String,
    /// Brightness-weighted circular mean azimuth
    pub mean_azimuth_deg: qtty::Degrees,
    /// Brightness-weighted mean altitude
    pub mean_altitude_deg: qtty::Degrees,
}

/// The engine's sole output, handed to rendering and narrative collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkySnapshot {
    pub context: ObserverContext,
    /// Magnitude-filtered; may include stars below the horizon
    pub stars: Vec<StarObservation>,
    pub visible_segments: Vec<ConstellationSegment>,
    pub magnitude_limit: f64,
    pub constellation_positions: Vec<ConstellationPosition>,
}

impl SkySnapshot {
    /// Codes of the constellations with a computed position, in snapshot order.
    pub fn constellation_codes(&self) -> Vec<&str> {
        self.constellation_positions
            .iter()
            .map(|p| p.code.as_str())
            .collect()
    }

    pub fn above_horizon_count(&self) -> usize {
        self.stars.iter().filter(|s| s.is_above_horizon()).count()
    }
}
