//! Equatorial to horizontal coordinate transform.
//!
//! Closed-form spherical trigonometry for a single instant:
//!
//! ```text
//!   LST = GMST(t) + longitude
//!   H   = LST - RA
//!   sin(alt) = sin(dec) sin(lat) + cos(dec) cos(lat) cos(H)
//!   az       = atan2(-sin(H) cos(dec), cos(lat) sin(dec) - sin(lat) cos(dec) cos(H))
//! ```
//!
//! Horizontal positions are then projected stereographically onto a plane
//! centered on the zenith, with the horizon on the unit circle and north
//! along +y. No refraction correction is applied.

use chrono::{DateTime, Utc};
use qtty::Degrees;

use crate::api::{CatalogStar, ObserverContext, StarObservation};

/// Julian date of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Julian date of J2000.0.
const J2000_JD: f64 = 2_451_545.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Wrap an angle to [0, 360).
///
/// `rem_euclid` can round up to exactly 360.0 for tiny negative inputs, and
/// `-0.0` is folded to `0.0`.
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0) + 0.0;
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Julian date (UT) of an instant.
pub fn julian_date(instant: DateTime<Utc>) -> f64 {
    let seconds = instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) * 1e-9;
    seconds / SECONDS_PER_DAY + UNIX_EPOCH_JD
}

/// Greenwich mean sidereal time in degrees, [0, 360).
pub fn greenwich_mean_sidereal_time(instant: DateTime<Utc>) -> f64 {
    let d = julian_date(instant) - J2000_JD;
    let t = d / DAYS_PER_CENTURY;
    let gmst = 280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    wrap_degrees(gmst)
}

/// Local sidereal time in degrees for an east-positive longitude.
pub fn local_sidereal_time(instant: DateTime<Utc>, longitude_deg: f64) -> f64 {
    wrap_degrees(greenwich_mean_sidereal_time(instant) + longitude_deg)
}

/// Altitude/azimuth pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalPosition {
    pub altitude_deg: f64,
    /// From north through east, [0, 360)
    pub azimuth_deg: f64,
}

/// Horizontal position of a star from its hour angle, declination and the observer latitude.
pub fn equatorial_to_horizontal(hour_angle_deg: f64, dec_deg: f64, lat_deg: f64) -> HorizontalPosition {
    let h = hour_angle_deg.to_radians();
    let dec = dec_deg.to_radians();
    let lat = lat_deg.to_radians();

    let sin_alt = dec.sin() * lat.sin() + dec.cos() * lat.cos() * h.cos();
    let altitude = sin_alt.clamp(-1.0, 1.0).asin();

    let azimuth = (-h.sin() * dec.cos()).atan2(lat.cos() * dec.sin() - lat.sin() * dec.cos() * h.cos());

    HorizontalPosition {
        altitude_deg: altitude.to_degrees(),
        azimuth_deg: wrap_degrees(azimuth.to_degrees()),
    }
}

/// Zenith-centered stereographic projection.
///
/// `r = tan((90 - alt) / 2)`, so the zenith maps to the origin and the
/// horizon to the unit circle. Returns `(x, y)` with east on +x and north on +y.
pub fn stereographic_projection(position: HorizontalPosition) -> (f64, f64) {
    let r = ((90.0 - position.altitude_deg) / 2.0).to_radians().tan();
    let az = position.azimuth_deg.to_radians();
    (r * az.sin(), r * az.cos())
}

/// Observe a single star from a precomputed local sidereal time.
pub fn observe_star(star: &CatalogStar, lst_deg: f64, lat_deg: f64) -> StarObservation {
    let hour_angle = wrap_degrees(lst_deg - star.ra_deg.value());
    let horizontal = equatorial_to_horizontal(hour_angle, star.dec_deg.value(), lat_deg);
    let (x, y) = stereographic_projection(horizontal);

    StarObservation {
        catalog_id: star.catalog_id,
        ra_deg: star.ra_deg,
        dec_deg: star.dec_deg,
        magnitude: star.magnitude,
        x,
        y,
        azimuth_deg: Degrees::new(horizontal.azimuth_deg),
        altitude_deg: Degrees::new(horizontal.altitude_deg),
    }
}

/// Transform a catalog for one observer frame.
///
/// Output keeps catalog order. Malformed entries are dropped. The function
/// is pure: the same inputs always produce identical observations.
pub fn transform(catalog: &[CatalogStar], context: &ObserverContext) -> Vec<StarObservation> {
    let lst = local_sidereal_time(context.instant_utc, context.longitude.value());
    let lat = context.latitude.value();

    catalog
        .iter()
        .filter(|star| star.is_well_formed())
        .map(|star| observe_star(star, lst, lat))
        .collect()
}
