//! Hipparcos main catalog (`hip_main.dat`) loader.
//!
//! Each record is a single `|`-separated line. Only four fields are used:
//!
//! | index | field | meaning                  |
//! |-------|-------|--------------------------|
//! | 1     | HIP   | catalog number           |
//! | 5     | Vmag  | visual magnitude         |
//! | 8     | RAdeg | right ascension, degrees |
//! | 9     | DEdeg | declination, degrees     |
//!
//! Records with any of these blank or unparsable are dropped.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use super::StarCatalogProvider;
use crate::api::{CatalogStar, HipId};

const FIELD_HIP: usize = 1;
const FIELD_VMAG: usize = 5;
const FIELD_RA_DEG: usize = 8;
const FIELD_DEC_DEG: usize = 9;

/// Stars parsed from a Hipparcos main catalog file, in file order.
#[derive(Debug, Clone, Default)]
pub struct HipparcosCatalog {
    stars: Vec<CatalogStar>,
    dropped: usize,
}

impl HipparcosCatalog {
    /// Load the catalog from a file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open star catalog {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("Failed to read star catalog {}", path.display()))
    }

    /// Load the catalog from any reader producing `hip_main.dat` lines.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut catalog = Self::default();
        for line in BufReader::new(reader).lines() {
            let line = line.context("Failed to read catalog line")?;
            if line.trim().is_empty() {
                continue;
            }
            match parse_record(&line) {
                Some(star) => catalog.stars.push(star),
                None => catalog.dropped += 1,
            }
        }
        Ok(catalog)
    }

    /// Number of records rejected as malformed.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn into_stars(self) -> Vec<CatalogStar> {
        self.stars
    }
}

impl StarCatalogProvider for HipparcosCatalog {
    fn all_stars(&self) -> &[CatalogStar] {
        &self.stars
    }
}

fn parse_record(line: &str) -> Option<CatalogStar> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() <= FIELD_DEC_DEG {
        return None;
    }

    let hip: HipId = fields[FIELD_HIP].parse().ok()?;
    let magnitude = parse_float(fields[FIELD_VMAG])?;
    let ra = parse_float(fields[FIELD_RA_DEG])?;
    let dec = parse_float(fields[FIELD_DEC_DEG])?;

    let star = CatalogStar::new(hip.value(), ra, dec, magnitude);
    star.is_well_formed().then_some(star)
}

fn parse_float(field: &str) -> Option<f64> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BETELGEUSE: &str = "H|       27989| |05 55 10.29|+07 24 25.3| 0.45|1|H|088.79287161|+07.40703634|  1|  0.03|   8.00|";
    const RIGEL: &str = "H|       24436| |05 14 32.27|-08 12 05.9| 0.18| |H|078.63446353|-08.20163919|  1|  0.13|  16.34|";
    const NO_ASTROMETRY: &str = "H|       73990| |15 07 19.00|-26 40 17.9|11.65| |G|            |            |   |";

    #[test]
    fn test_parse_valid_records() {
        let data = format!("{}\n{}\n", BETELGEUSE, RIGEL);
        let catalog = HipparcosCatalog::from_reader(data.as_bytes()).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.dropped(), 0);
        let stars = catalog.all_stars();
        assert_eq!(stars[0].catalog_id, HipId::new(27989));
        assert!((stars[0].ra_deg.value() - 88.79287161).abs() < 1e-9);
        assert!((stars[0].dec_deg.value() - 7.40703634).abs() < 1e-9);
        assert!((stars[1].magnitude - 0.18).abs() < 1e-9);
    }

    #[test]
    fn test_records_without_positions_are_dropped() {
        let data = format!("{}\n{}\n\n", BETELGEUSE, NO_ASTROMETRY);
        let catalog = HipparcosCatalog::from_reader(data.as_bytes()).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.dropped(), 1);
    }

    #[test]
    fn test_truncated_and_garbage_lines_are_dropped() {
        let data = "H|1|\nnot a record\nH|abc| | | | 1.0| | |10.0|20.0|\n";
        let catalog = HipparcosCatalog::from_reader(data.as_bytes()).unwrap();

        assert!(catalog.is_empty());
        assert_eq!(catalog.dropped(), 3);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", RIGEL).unwrap();

        let catalog = HipparcosCatalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.into_stars()[0].catalog_id.value(), 24436);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = HipparcosCatalog::from_path(Path::new("/nonexistent/hip_main.dat"));
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Failed to open star catalog"));
    }
}
