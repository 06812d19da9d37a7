//! Query orchestration.
//!
//! One query flows through the stages in order:
//!
//! ```text
//!   RawQuery -> AddressResolver -> observer frame -> transform
//!            -> magnitude filter -> constellation assembly -> SkySnapshot
//! ```
//!
//! The engine keeps no state between calls. The catalog it holds is shared
//! and read-only.

use std::sync::Arc;

use log::debug;

use super::constellations::{assemble, ConstellationWeighting};
use super::observer_frame::{build_observer_context, parse_local_date_time, TimezoneLookup, TzfLookup};
use super::transform::transform;
use super::visibility::filter_by_magnitude;
use crate::api::{CatalogStar, ConstellationSegment, LocalizationHint, ObserverContext, RawQuery, SkySnapshot};
use crate::catalog::CatalogStore;
use crate::config::{EngineConfig, SkySettings};
use crate::error::SkyResult;
use crate::geocoding::AddressResolver;

/// Compute a snapshot for a resolved observer frame.
///
/// # Arguments
/// * `stars` - Catalog stars, in catalog order
/// * `segments` - Constellation line table, in file order
/// * `context` - Observer frame
/// * `magnitude_limit` - Faintest magnitude kept in the star list (inclusive)
/// * `weighting` - Brightness weighting for constellation positions
///
/// # Returns
/// The snapshot. Its star list is magnitude-filtered only; constellation
/// segments and positions use stars at or above the horizon.
pub fn compute_sky_snapshot(
    stars: &[CatalogStar],
    segments: &[ConstellationSegment],
    context: ObserverContext,
    magnitude_limit: f64,
    weighting: ConstellationWeighting,
) -> SkySnapshot {
    let observations = transform(stars, &context);
    let plotted = filter_by_magnitude(observations, magnitude_limit);
    let assembly = assemble(&plotted, segments, weighting);

    SkySnapshot {
        context,
        stars: plotted,
        visible_segments: assembly.visible_segments,
        magnitude_limit,
        constellation_positions: assembly.positions,
    }
}

/// Sky computation service.
pub struct SkyEngine {
    catalog: Arc<CatalogStore>,
    resolver: AddressResolver,
    timezones: Arc<dyn TimezoneLookup>,
    settings: SkySettings,
}

impl SkyEngine {
    pub fn new(
        catalog: Arc<CatalogStore>,
        resolver: AddressResolver,
        timezones: Arc<dyn TimezoneLookup>,
        settings: SkySettings,
    ) -> Self {
        Self {
            catalog,
            resolver,
            timezones,
            settings,
        }
    }

    /// Wire the engine with the real geocoders and the bundled timezone polygons.
    pub fn from_config(config: &EngineConfig, catalog: Arc<CatalogStore>) -> SkyResult<Self> {
        let resolver = AddressResolver::from_settings(&config.geocoding)?;
        Ok(Self::new(
            catalog,
            resolver,
            Arc::new(TzfLookup::new()),
            config.sky,
        ))
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn settings(&self) -> SkySettings {
        self.settings
    }

    /// Resolve the address and build the observer frame.
    ///
    /// The timestamp is checked before any provider is contacted.
    pub async fn resolve_observer(&self, query: &RawQuery, hint: LocalizationHint) -> SkyResult<ObserverContext> {
        parse_local_date_time(&query.local_date_time)?;

        let found = self.resolver.resolve(&query.address, hint).await?;
        build_observer_context(
            found.latitude,
            found.longitude,
            &query.local_date_time,
            &found.display_address,
            self.timezones.as_ref(),
        )
    }

    /// Run a full query with the configured magnitude limit.
    pub async fn run(&self, query: &RawQuery, hint: LocalizationHint) -> SkyResult<SkySnapshot> {
        self.run_with_limit(query, hint, self.settings.magnitude_limit).await
    }

    /// Run a full query with an explicit magnitude limit.
    pub async fn run_with_limit(
        &self,
        query: &RawQuery,
        hint: LocalizationHint,
        magnitude_limit: f64,
    ) -> SkyResult<SkySnapshot> {
        let context = self.resolve_observer(query, hint).await?;
        let snapshot = self.compute_sky_data(context, magnitude_limit);
        debug!(
            "Snapshot for '{}': {} stars, {} segments, {} constellations",
            snapshot.context.display_address,
            snapshot.stars.len(),
            snapshot.visible_segments.len(),
            snapshot.constellation_positions.len()
        );
        Ok(snapshot)
    }

    /// Compute a snapshot for an already resolved frame. Pure; no I/O.
    pub fn compute_sky_data(&self, context: ObserverContext, magnitude_limit: f64) -> SkySnapshot {
        compute_sky_snapshot(
            self.catalog.stars(),
            self.catalog.segments(),
            context,
            magnitude_limit,
            ConstellationWeighting::from(&self.settings),
        )
    }
}
