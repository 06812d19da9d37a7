//! Star catalog and constellation line-table providers.
//!
//! Both data sets are loaded once at process start and never mutated. The
//! [`CatalogStore`] freezes them behind an `Arc` so every query can share the
//! same read-only copy without locking.
//!
//! # Module Organization
//!
//! - [`hipparcos`]: `hip_main.dat` loader
//! - [`constellations`]: `constellationship.fab` loader
//! - [`checksum`]: content checksum of the loaded data

pub mod checksum;
pub mod constellations;
pub mod hipparcos;

pub use checksum::calculate_checksum;
pub use constellations::ConstellationLineTable;
pub use hipparcos::HipparcosCatalog;

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use log::info;

use crate::api::{CatalogStar, ConstellationSegment, HipId};
use crate::config::CatalogSettings;
use crate::error::{SkyError, SkyResult};

/// Source of catalog stars.
pub trait StarCatalogProvider {
    /// Every cataloged star, in catalog order.
    fn all_stars(&self) -> &[CatalogStar];
}

/// Source of constellation line segments.
pub trait ConstellationLineProvider {
    /// Every segment, in line-table order.
    fn all_segments(&self) -> &[ConstellationSegment];
}

/// Catalog held entirely in memory, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    pub stars: Vec<CatalogStar>,
    pub segments: Vec<ConstellationSegment>,
}

impl InMemoryCatalog {
    pub fn new(stars: Vec<CatalogStar>, segments: Vec<ConstellationSegment>) -> Self {
        Self { stars, segments }
    }
}

impl StarCatalogProvider for InMemoryCatalog {
    fn all_stars(&self) -> &[CatalogStar] {
        &self.stars
    }
}

impl ConstellationLineProvider for InMemoryCatalog {
    fn all_segments(&self) -> &[ConstellationSegment] {
        &self.segments
    }
}

/// Frozen, validated catalog data shared by every query.
#[derive(Debug)]
pub struct CatalogStore {
    stars: Vec<CatalogStar>,
    segments: Vec<ConstellationSegment>,
    checksum: String,
    dropped_stars: usize,
    dropped_segments: usize,
}

impl CatalogStore {
    /// Validate and freeze catalog data.
    ///
    /// Malformed stars and repeated catalog IDs (after the first) are dropped.
    /// Segments whose endpoints are not both catalog IDs are dropped.
    pub fn load(stars: &dyn StarCatalogProvider, lines: &dyn ConstellationLineProvider) -> Self {
        let mut seen: HashSet<HipId> = HashSet::new();
        let mut kept_stars = Vec::with_capacity(stars.all_stars().len());
        for star in stars.all_stars() {
            if star.is_well_formed() && seen.insert(star.catalog_id) {
                kept_stars.push(star.clone());
            }
        }
        let dropped_stars = stars.all_stars().len() - kept_stars.len();

        let kept_segments: Vec<ConstellationSegment> = lines
            .all_segments()
            .iter()
            .filter(|s| seen.contains(&s.from_star) && seen.contains(&s.to_star))
            .cloned()
            .collect();
        let dropped_segments = lines.all_segments().len() - kept_segments.len();

        let checksum = calculate_checksum(&kept_stars, &kept_segments);
        info!(
            "Catalog loaded: {} stars ({} dropped), {} segments ({} dropped), checksum {}",
            kept_stars.len(),
            dropped_stars,
            kept_segments.len(),
            dropped_segments,
            checksum
        );

        Self {
            stars: kept_stars,
            segments: kept_segments,
            checksum,
            dropped_stars,
            dropped_segments,
        }
    }

    /// Load both files named in the configuration.
    pub fn from_settings(settings: &CatalogSettings) -> SkyResult<Self> {
        let stars = HipparcosCatalog::from_path(&settings.stars_path)
            .map_err(|e| SkyError::Catalog(format!("{:#}", e)))?;
        let lines = ConstellationLineTable::from_path(&settings.constellations_path)
            .map_err(|e| SkyError::Catalog(format!("{:#}", e)))?;
        if stars.is_empty() {
            return Err(SkyError::Catalog(format!(
                "Star catalog {} contains no usable records",
                settings.stars_path.display()
            )));
        }
        Ok(Self::load(&stars, &lines))
    }

    pub fn stars(&self) -> &[CatalogStar] {
        &self.stars
    }

    pub fn segments(&self) -> &[ConstellationSegment] {
        &self.segments
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn dropped_stars(&self) -> usize {
        self.dropped_stars
    }

    pub fn dropped_segments(&self) -> usize {
        self.dropped_segments
    }
}

impl StarCatalogProvider for CatalogStore {
    fn all_stars(&self) -> &[CatalogStar] {
        &self.stars
    }
}

impl ConstellationLineProvider for CatalogStore {
    fn all_segments(&self) -> &[ConstellationSegment] {
        &self.segments
    }
}

/// Global catalog instance initialized once per process.
static CATALOG: OnceLock<Arc<CatalogStore>> = OnceLock::new();

/// Load the global catalog from the configured files. Later calls are no-ops.
pub fn init_catalog(settings: &CatalogSettings) -> SkyResult<()> {
    if CATALOG.get().is_some() {
        return Ok(());
    }

    let store = CatalogStore::from_settings(settings)?;
    let _ = CATALOG.set(Arc::new(store));
    Ok(())
}

/// Get a reference to the global catalog instance.
pub fn get_catalog() -> SkyResult<&'static Arc<CatalogStore>> {
    CATALOG.get().ok_or_else(|| {
        SkyError::Configuration("Catalog not initialized. Call init_catalog() first.".to_string())
    })
}
