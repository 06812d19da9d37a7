//! Constellation assembly.
//!
//! Picks the line segments whose two endpoints are both above the horizon
//! and reduces each visible constellation to one brightness-weighted
//! position. Azimuth is averaged on the circle:
//!
//! ```text
//!   w        = 1 / (magnitude + offset)
//!   mean_alt = sum(w * alt) / sum(w)
//!   mean_az  = atan2(sum(w * sin az), sum(w * cos az)) mod 360
//! ```

use std::collections::{HashMap, HashSet};

use qtty::Degrees;

use super::transform::wrap_degrees;
use super::visibility::above_horizon;
use crate::api::{ConstellationPosition, ConstellationSegment, HipId, StarObservation};
use crate::config::SkySettings;

/// Brightness weighting for constellation positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstellationWeighting {
    /// Added to the magnitude before inverting
    pub offset: f64,
}

impl Default for ConstellationWeighting {
    fn default() -> Self {
        Self { offset: 3.0 }
    }
}

impl From<&SkySettings> for ConstellationWeighting {
    fn from(settings: &SkySettings) -> Self {
        Self {
            offset: settings.weight_offset,
        }
    }
}

impl ConstellationWeighting {
    pub fn new(offset: f64) -> Self {
        Self { offset }
    }

    /// Weight of a star, or `None` when it would not be positive and finite.
    pub fn weight(&self, magnitude: f64) -> Option<f64> {
        let w = 1.0 / (magnitude + self.offset);
        (w.is_finite() && w > 0.0).then_some(w)
    }
}

/// Visible segments and per-constellation positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstellationAssembly {
    /// Line-table order
    pub visible_segments: Vec<ConstellationSegment>,
    /// One per visible code, in first-seen order
    pub positions: Vec<ConstellationPosition>,
}

/// Assemble visible constellations from one set of observations.
///
/// # Arguments
/// * `observations` - Star observations for the query; below-horizon entries are ignored
/// * `segments` - The constellation line table, in file order
/// * `weighting` - Brightness weighting for the mean positions
pub fn assemble(
    observations: &[StarObservation],
    segments: &[ConstellationSegment],
    weighting: ConstellationWeighting,
) -> ConstellationAssembly {
    let visible = above_horizon(observations);

    let visible_segments: Vec<ConstellationSegment> = segments
        .iter()
        .filter(|s| visible.contains_key(&s.from_star) && visible.contains_key(&s.to_star))
        .cloned()
        .collect();

    // Member stars per code, both in first-seen order
    let mut order: Vec<&str> = Vec::new();
    let mut members: HashMap<&str, (Vec<HipId>, HashSet<HipId>)> = HashMap::new();
    for segment in &visible_segments {
        let entry = members.entry(segment.code.as_str()).or_insert_with(|| {
            order.push(segment.code.as_str());
            (Vec::new(), HashSet::new())
        });
        for id in [segment.from_star, segment.to_star] {
            if entry.1.insert(id) {
                entry.0.push(id);
            }
        }
    }

    let positions = order
        .iter()
        .filter_map(|code| {
            let (ids, _) = members.get(code)?;
            let stars: Vec<&StarObservation> = ids.iter().filter_map(|id| visible.get(id).copied()).collect();
            weighted_mean_position(code, &stars, weighting)
        })
        .collect();

    ConstellationAssembly {
        visible_segments,
        positions,
    }
}

/// Brightness-weighted position of a group of stars.
///
/// Returns `None` when no star carries a usable weight.
pub fn weighted_mean_position(
    code: &str,
    stars: &[&StarObservation],
    weighting: ConstellationWeighting,
) -> Option<ConstellationPosition> {
    let mut total_weight = 0.0;
    let mut altitude_sum = 0.0;
    let mut sin_sum = 0.0;
    let mut cos_sum = 0.0;

    for star in stars {
        let Some(w) = weighting.weight(star.magnitude) else {
            continue;
        };
        let az = star.azimuth_deg.value().to_radians();
        total_weight += w;
        altitude_sum += w * star.altitude_deg.value();
        sin_sum += w * az.sin();
        cos_sum += w * az.cos();
    }

    if total_weight <= 0.0 {
        return None;
    }

    Some(ConstellationPosition {
        code: code.to_string(),
        mean_azimuth_deg: Degrees::new(wrap_degrees(sin_sum.atan2(cos_sum).to_degrees())),
        mean_altitude_deg: Degrees::new(altitude_sum / total_weight),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(id: u32, magnitude: f64, azimuth: f64, altitude: f64) -> StarObservation {
        StarObservation {
            catalog_id: HipId::new(id),
            ra_deg: Degrees::new(0.0),
            dec_deg: Degrees::new(0.0),
            magnitude,
            x: 0.0,
            y: 0.0,
            azimuth_deg: Degrees::new(azimuth),
            altitude_deg: Degrees::new(altitude),
        }
    }

    fn angular_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    #[test]
    fn test_circular_mean_across_north() {
        let stars = [obs(1, 2.0, 350.0, 30.0), obs(2, 2.0, 10.0, 50.0)];
        let segments = [ConstellationSegment::new(1, 2, "Cas")];

        let result = assemble(&stars, &segments, ConstellationWeighting::default());

        assert_eq!(result.positions.len(), 1);
        let pos = &result.positions[0];
        assert!(angular_distance(pos.mean_azimuth_deg.value(), 0.0) < 0.5);
        assert!((pos.mean_altitude_deg.value() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_brighter_star_dominates() {
        let stars = [obs(1, -1.0, 90.0, 20.0), obs(2, 5.0, 90.0, 60.0)];
        let segments = [ConstellationSegment::new(1, 2, "CMa")];

        let result = assemble(&stars, &segments, ConstellationWeighting::default());
        // w1 = 1/2, w2 = 1/8
        let expected = (0.5 * 20.0 + 0.125 * 60.0) / 0.625;
        assert!((result.positions[0].mean_altitude_deg.value() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_segment_needs_both_endpoints_above_horizon() {
        let stars = [obs(1, 1.0, 100.0, 10.0), obs(2, 1.0, 110.0, -3.0), obs(3, 1.0, 120.0, 5.0)];
        let segments = [
            ConstellationSegment::new(1, 2, "Ori"),
            ConstellationSegment::new(1, 3, "Ori"),
            ConstellationSegment::new(2, 3, "Ori"),
        ];

        let result = assemble(&stars, &segments, ConstellationWeighting::default());

        assert_eq!(result.visible_segments, vec![ConstellationSegment::new(1, 3, "Ori")]);
        let visible: HashMap<HipId, &StarObservation> = above_horizon(&stars);
        for segment in &result.visible_segments {
            assert!(visible[&segment.from_star].altitude_deg.value() >= 0.0);
            assert!(visible[&segment.to_star].altitude_deg.value() >= 0.0);
        }
    }

    #[test]
    fn test_codes_in_first_seen_order() {
        let stars = [
            obs(1, 1.0, 10.0, 10.0),
            obs(2, 1.0, 20.0, 10.0),
            obs(3, 1.0, 30.0, 10.0),
            obs(4, 1.0, 40.0, 10.0),
        ];
        let segments = [
            ConstellationSegment::new(3, 4, "Tau"),
            ConstellationSegment::new(1, 2, "Ori"),
            ConstellationSegment::new(2, 3, "Tau"),
        ];

        let result = assemble(&stars, &segments, ConstellationWeighting::default());
        let codes: Vec<&str> = result.positions.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, vec!["Tau", "Ori"]);
        assert_eq!(result.visible_segments.len(), 3);
    }

    #[test]
    fn test_shared_endpoint_counted_once() {
        let stars = [obs(1, 0.0, 0.0, 80.0), obs(2, 0.0, 0.0, 20.0), obs(3, 0.0, 0.0, 20.0)];
        let segments = [ConstellationSegment::new(1, 2, "Lyr"), ConstellationSegment::new(1, 3, "Lyr")];

        let result = assemble(&stars, &segments, ConstellationWeighting::default());
        // Equal weights over three distinct stars
        assert!((result.positions[0].mean_altitude_deg.value() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_star_mean_is_its_position() {
        let star = obs(1, 1.5, 123.4, 56.7);
        let pos = weighted_mean_position("Vir", &[&star], ConstellationWeighting::default()).unwrap();

        assert!(angular_distance(pos.mean_azimuth_deg.value(), 123.4) < 1e-9);
        assert!((pos.mean_altitude_deg.value() - 56.7).abs() < 1e-9);
    }

    #[test]
    fn test_unusable_weights_are_skipped() {
        let weighting = ConstellationWeighting::default();
        assert!(weighting.weight(-3.0).is_none());
        assert!(weighting.weight(-4.0).is_none());
        assert_eq!(weighting.weight(1.0), Some(0.25));

        let star = obs(1, -3.0, 10.0, 10.0);
        assert!(weighted_mean_position("Xxx", &[&star], weighting).is_none());
    }

    #[test]
    fn test_nothing_visible() {
        let stars = [obs(1, 1.0, 0.0, -10.0), obs(2, 1.0, 0.0, -20.0)];
        let segments = [ConstellationSegment::new(1, 2, "Cru")];

        let result = assemble(&stars, &segments, ConstellationWeighting::default());
        assert!(result.visible_segments.is_empty());
        assert!(result.positions.is_empty());
    }

    #[test]
    fn test_weighting_from_settings() {
        let settings = SkySettings {
            magnitude_limit: 6.5,
            weight_offset: 2.0,
        };
        assert_eq!(ConstellationWeighting::from(&settings).offset, 2.0);
    }
}
