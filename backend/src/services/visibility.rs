//! Visibility predicates.
//!
//! The magnitude cut decides which stars are plotted; the horizon cut only
//! decides which stars take part in constellation logic. Stars that have set
//! can therefore still be plotted.

use std::collections::HashMap;

use crate::api::{HipId, StarObservation};

/// Keep observations with `magnitude <= magnitude_limit`, in input order.
pub fn filter_by_magnitude(observations: Vec<StarObservation>, magnitude_limit: f64) -> Vec<StarObservation> {
    observations
        .into_iter()
        .filter(|obs| obs.magnitude <= magnitude_limit)
        .collect()
}

/// Observations at or above the horizon, keyed by catalog ID.
///
/// The first observation wins if an ID repeats.
pub fn above_horizon(observations: &[StarObservation]) -> HashMap<HipId, &StarObservation> {
    let mut visible = HashMap::with_capacity(observations.len());
    for obs in observations.iter().filter(|o| o.is_above_horizon()) {
        visible.entry(obs.catalog_id).or_insert(obs);
    }
    visible
}
