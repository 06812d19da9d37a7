//! Checksum of loaded catalog data, reported on startup and by the health endpoint.

use sha2::{Digest, Sha256};

use crate::api::{CatalogStar, ConstellationSegment};

/// Calculate a SHA-256 checksum over the loaded stars and segments.
///
/// Records are hashed in order with a fixed textual layout, so the checksum
/// only changes when the data (or its order) changes.
///
/// # Returns
/// Hexadecimal string representation of the hash.
pub fn calculate_checksum(stars: &[CatalogStar], segments: &[ConstellationSegment]) -> String {
    let mut hasher = Sha256::new();
    for star in stars {
        hasher.update(
            format!(
                "S|{}|{:.8}|{:.8}|{:.2}\n",
                star.catalog_id,
                star.ra_deg.value(),
                star.dec_deg.value(),
                star.magnitude
            )
            .as_bytes(),
        );
    }
    for segment in segments {
        hasher.update(
            format!("L|{}|{}|{}\n", segment.code, segment.from_star, segment.to_star).as_bytes(),
        );
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let stars = vec![CatalogStar::new(1, 10.0, 20.0, 3.5)];
        let segments = vec![ConstellationSegment::new(1, 2, "Ori")];
        assert_eq!(
            calculate_checksum(&stars, &segments),
            calculate_checksum(&stars, &segments)
        );
        assert_eq!(calculate_checksum(&stars, &segments).len(), 64);
    }

    #[test]
    fn test_different_content_different_checksum() {
        let a = vec![CatalogStar::new(1, 10.0, 20.0, 3.5)];
        let b = vec![CatalogStar::new(1, 10.0, 20.0, 3.6)];
        assert_ne!(calculate_checksum(&a, &[]), calculate_checksum(&b, &[]));
    }

    #[test]
    fn test_segment_order_matters() {
        let first = vec![
            ConstellationSegment::new(1, 2, "Ori"),
            ConstellationSegment::new(2, 3, "Ori"),
        ];
        let second = vec![first[1].clone(), first[0].clone()];
        assert_ne!(calculate_checksum(&[], &first), calculate_checksum(&[], &second));
    }
}
