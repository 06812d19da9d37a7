//! Observer frame construction.
//!
//! Turns resolved coordinates plus a zone-less local wall-clock time into a
//! UTC-anchored [`ObserverContext`]. The timezone comes from a geospatial
//! polygon lookup on the coordinates, never from the caller.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use log::debug;

use crate::api::ObserverContext;
use crate::error::{SkyError, SkyResult};

/// Accepted local timestamp layout.
pub const LOCAL_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Geospatial timezone lookup.
pub trait TimezoneLookup: Send + Sync {
    /// IANA zone name covering the point, or `None` (e.g. open ocean).
    fn timezone_at(&self, latitude: f64, longitude: f64) -> Option<String>;
}

/// Timezone lookup over the polygon set bundled with `tzf-rs`.
pub struct TzfLookup {
    finder: tzf_rs::DefaultFinder,
}

impl TzfLookup {
    pub fn new() -> Self {
        Self {
            finder: tzf_rs::DefaultFinder::new(),
        }
    }
}

impl Default for TzfLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneLookup for TzfLookup {
    fn timezone_at(&self, latitude: f64, longitude: f64) -> Option<String> {
        let name = self.finder.get_tz_name(longitude, latitude);
        (!name.is_empty()).then(|| name.to_string())
    }
}

/// Parse a `YYYY-MM-DD HH:MM` local timestamp.
pub fn parse_local_date_time(value: &str) -> SkyResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), LOCAL_DATE_TIME_FORMAT).map_err(|_| {
        SkyError::InvalidLocalTime {
            value: value.to_string(),
        }
    })
}

/// Convert a wall-clock time in `tz` to UTC.
///
/// Ambiguous times (clocks turned back) take the earliest instant. Times that
/// fall in a gap (clocks turned forward) are read with the offset in force
/// before the gap, which shifts the wall clock forward by the gap length.
pub fn localize_to_utc(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            let before_gap = naive.checked_sub_signed(Duration::days(1))?;
            let offset = tz.from_local_datetime(&before_gap).earliest()?.offset().fix();
            let utc = naive.checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))?;
            Some(Utc.from_utc_datetime(&utc))
        }
    }
}

/// Build the observer frame for one query.
///
/// # Arguments
/// * `latitude`, `longitude` - Resolved coordinates in degrees
/// * `local_date_time` - Wall-clock time at the location, `YYYY-MM-DD HH:MM`
/// * `display_address` - Normalized label from the geocoder
/// * `timezones` - Geospatial zone lookup
///
/// # Returns
/// * `Err(SkyError::InvalidLocalTime)` if the timestamp does not parse
/// * `Err(SkyError::TimezoneResolution)` if no zone covers the coordinates
pub fn build_observer_context(
    latitude: f64,
    longitude: f64,
    local_date_time: &str,
    display_address: &str,
    timezones: &dyn TimezoneLookup,
) -> SkyResult<ObserverContext> {
    let naive = parse_local_date_time(local_date_time)?;

    let zone_error = || SkyError::TimezoneResolution {
        latitude,
        longitude,
    };
    let zone_name = timezones.timezone_at(latitude, longitude).ok_or_else(zone_error)?;
    let tz: Tz = zone_name.parse().map_err(|_| zone_error())?;

    let instant_utc = localize_to_utc(naive, tz).ok_or_else(zone_error)?;
    debug!(
        "Local time {} in {} is {} UTC",
        naive, zone_name, instant_utc
    );

    Ok(ObserverContext::new(
        latitude,
        longitude,
        instant_utc,
        display_address,
    ))
}
