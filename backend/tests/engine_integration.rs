use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use nightsky_rust::api::{LocalizationHint, ObserverContext, RawQuery};
use nightsky_rust::catalog::{CatalogStore, ConstellationLineTable, HipparcosCatalog};
use nightsky_rust::config::{CatalogSettings, SkySettings};
use nightsky_rust::geocoding::{AddressResolver, GeocodeMatch, GeocodingProvider, ProviderOutcome};
use nightsky_rust::services::{NarrativeBrief, SkyEngine, TzfLookup};
use nightsky_rust::SkyError;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn fixture_settings() -> CatalogSettings {
    CatalogSettings {
        stars_path: fixture("hip_sample.dat"),
        constellations_path: fixture("constellationship_sample.fab"),
    }
}

/// Geocoder that knows a couple of cities.
struct Gazetteer;

#[async_trait]
impl GeocodingProvider for Gazetteer {
    fn name(&self) -> &str {
        "gazetteer"
    }

    async fn try_resolve(&self, address: &str) -> ProviderOutcome {
        let (lat, lon, label) = match address {
            "Busan" => (35.1, 129.0, "Busan, South Korea"),
            "Sydney" => (-33.87, 151.21, "Sydney, Australia"),
            _ => return ProviderOutcome::NotFound,
        };
        match GeocodeMatch::new(lat, lon, label, self.name()) {
            Ok(found) => ProviderOutcome::Match(found),
            Err(err) => ProviderOutcome::TransportError(err),
        }
    }
}

fn engine() -> SkyEngine {
    let store = CatalogStore::from_settings(&fixture_settings()).unwrap();
    let resolver = AddressResolver::new(None, Arc::new(Gazetteer));
    SkyEngine::new(Arc::new(store), resolver, Arc::new(TzfLookup::new()), SkySettings::default())
}

#[test]
fn test_fixture_files_load() {
    let stars = HipparcosCatalog::from_path(&fixture("hip_sample.dat")).unwrap();
    assert_eq!(stars.len(), 13);
    assert_eq!(stars.dropped(), 1);

    let lines = ConstellationLineTable::from_path(&fixture("constellationship_sample.fab")).unwrap();
    assert_eq!(lines.len(), 9);
    assert_eq!(lines.skipped_records(), 1);

    let store = CatalogStore::from_settings(&fixture_settings()).unwrap();
    assert_eq!(store.stars().len(), 13);
    assert_eq!(store.segments().len(), 9);
}

#[test]
fn test_checksum_is_stable_across_loads() {
    let a = CatalogStore::from_settings(&fixture_settings()).unwrap();
    let b = CatalogStore::from_settings(&fixture_settings()).unwrap();
    assert_eq!(a.checksum(), b.checksum());
}

#[tokio::test]
async fn test_busan_winter_midnight() {
    let engine = engine();
    let snapshot = engine
        .run(&RawQuery::new("Busan", "1995-01-15 00:00"), LocalizationHint::Fallback)
        .await
        .unwrap();

    assert_eq!(
        snapshot.context.instant_utc,
        Utc.with_ymd_and_hms(1995, 1, 14, 15, 0, 0).unwrap()
    );
    assert_eq!(snapshot.context.display_address, "Busan, South Korea");

    // Everything but the magnitude 7 star is plotted, Crux included
    assert_eq!(snapshot.stars.len(), 12);
    assert!(snapshot.stars.iter().all(|s| s.magnitude <= 6.5));
    assert!(snapshot.stars.iter().any(|s| s.catalog_id.value() == 60718 && !s.is_above_horizon()));

    // Orion and Taurus are up; Crux never rises at 35N
    assert_eq!(snapshot.constellation_codes(), vec!["Ori", "Tau"]);
    assert_eq!(snapshot.visible_segments.len(), 7);
    assert!(snapshot.visible_segments.iter().all(|s| s.code != "Cru"));

    for position in &snapshot.constellation_positions {
        let alt = position.mean_altitude_deg.value();
        let az = position.mean_azimuth_deg.value();
        assert!((0.0..=90.0).contains(&alt), "{} alt {}", position.code, alt);
        assert!((0.0..360.0).contains(&az), "{} az {}", position.code, az);
    }

    // Orion sits in the south-west, roughly 45-55 degrees up
    let orion = &snapshot.constellation_positions[0];
    assert!(orion.mean_azimuth_deg.value() > 200.0 && orion.mean_azimuth_deg.value() < 230.0);
    assert!(orion.mean_altitude_deg.value() > 40.0 && orion.mean_altitude_deg.value() < 60.0);
}

#[tokio::test]
async fn test_sydney_sees_the_southern_cross() {
    let engine = engine();
    let snapshot = engine
        .run(&RawQuery::new("Sydney", "1995-01-15 02:00"), LocalizationHint::Fallback)
        .await
        .unwrap();

    // Daylight saving time (UTC+11) is in force in January
    assert_eq!(
        snapshot.context.instant_utc,
        Utc.with_ymd_and_hms(1995, 1, 14, 15, 0, 0).unwrap()
    );
    assert!(snapshot.constellation_codes().contains(&"Cru"));
}

#[test]
fn test_dim_endpoint_hides_segment() {
    let engine = engine();
    let ctx = ObserverContext::new(
        35.1,
        129.0,
        Utc.with_ymd_and_hms(1995, 1, 14, 15, 0, 0).unwrap(),
        "Busan",
    );

    let default_limit = engine.compute_sky_data(ctx.clone(), 6.5);
    assert!(!default_limit.constellation_codes().contains(&"Dim"));

    let deep = engine.compute_sky_data(ctx, 8.0);
    assert_eq!(deep.stars.len(), 13);
    assert!(deep.constellation_codes().contains(&"Dim"));
}

#[test]
fn test_compute_is_deterministic() {
    let engine = engine();
    let ctx = ObserverContext::new(
        35.1,
        129.0,
        Utc.with_ymd_and_hms(1995, 1, 14, 15, 0, 0).unwrap(),
        "Busan",
    );
    assert_eq!(engine.compute_sky_data(ctx.clone(), 6.5), engine.compute_sky_data(ctx, 6.5));
}

#[tokio::test]
async fn test_narrative_brief_from_run() {
    let engine = engine();
    let snapshot = engine
        .run(&RawQuery::new("Busan", "1995-01-15 00:00"), LocalizationHint::Primary)
        .await
        .unwrap();
    let brief = NarrativeBrief::from_snapshot(&snapshot, "1995-01-15 00:00");

    assert_eq!(brief.constellation_summary("ko"), "Ori, Tau");
    assert_eq!(brief.position_lines().len(), 2);
    assert!(brief.context_text("ko").contains("장소: Busan, South Korea"));
}

#[tokio::test]
async fn test_missing_timezone_is_user_facing() {
    struct Fixed;

    #[async_trait]
    impl GeocodingProvider for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn try_resolve(&self, _address: &str) -> ProviderOutcome {
            ProviderOutcome::Match(GeocodeMatch::new(35.1552, 129.0403, "Busan", "fixed").unwrap())
        }
    }

    let store = CatalogStore::from_settings(&fixture_settings()).unwrap();
    let engine = SkyEngine::new(
        Arc::new(store),
        AddressResolver::new(None, Arc::new(Fixed)),
        Arc::new(NoZone),
        SkySettings::default(),
    );

    let err = engine
        .run(&RawQuery::new("Busan", "2024-06-01 22:00"), LocalizationHint::Fallback)
        .await
        .unwrap_err();
    assert!(matches!(err, SkyError::TimezoneResolution { .. }));
    assert!(err.is_user_facing());
}

/// Lookup with no zone for any coordinate.
struct NoZone;

impl nightsky_rust::services::TimezoneLookup for NoZone {
    fn timezone_at(&self, _latitude: f64, _longitude: f64) -> Option<String> {
        None
    }
}
