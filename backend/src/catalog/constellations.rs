//! Constellation line table loader (Stellarium `constellationship.fab`).
//!
//! File format: `CODE pair_count HIP1 HIP2 HIP3 HIP4 ...`.
//! Consecutive HIP numbers form the segments `HIP1-HIP2`, `HIP3-HIP4`, ...

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use super::ConstellationLineProvider;
use crate::api::{ConstellationSegment, HipId};

/// Segments parsed from a line-table file, in file order.
#[derive(Debug, Clone, Default)]
pub struct ConstellationLineTable {
    segments: Vec<ConstellationSegment>,
    skipped_records: usize,
}

impl ConstellationLineTable {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open constellation lines {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("Failed to read constellation lines {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut table = Self::default();
        for line in BufReader::new(reader).lines() {
            let line = line.context("Failed to read line-table record")?;
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            match parse_record(&line) {
                Some(segments) => table.segments.extend(segments),
                None => table.skipped_records += 1,
            }
        }
        Ok(table)
    }

    /// Records rejected for having fewer than two IDs or a non-numeric ID.
    pub fn skipped_records(&self) -> usize {
        self.skipped_records
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn into_segments(self) -> Vec<ConstellationSegment> {
        self.segments
    }
}

impl ConstellationLineProvider for ConstellationLineTable {
    fn all_segments(&self) -> &[ConstellationSegment] {
        &self.segments
    }
}

fn parse_record(line: &str) -> Option<Vec<ConstellationSegment>> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return None;
    }

    let code = parts[0];
    let hips = parts[2..]
        .iter()
        .map(|p| p.parse::<HipId>())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    // A trailing unpaired ID is ignored
    let segments = hips
        .chunks_exact(2)
        .map(|pair| ConstellationSegment {
            from_star: pair[0],
            to_star: pair[1],
            code: code.to_string(),
        })
        .collect();
    Some(segments)
}
