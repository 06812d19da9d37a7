//! Hand-off for the narrative collaborator.
//!
//! The text generator only needs the place, the local time as the user
//! typed it, and which constellations were up. This module packages those;
//! it never calls out to a language model itself.

use serde::{Deserialize, Serialize};

use crate::api::{ConstellationPosition, SkySnapshot};

/// Most constellation codes passed on to the narrative.
pub const MAX_NARRATIVE_CONSTELLATIONS: usize = 10;

/// Everything a narrative generator receives for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeBrief {
    pub display_address: String,
    /// Local wall-clock time, as entered
    pub local_date_time: String,
    /// Up to ten IAU codes, in snapshot order
    pub constellation_codes: Vec<String>,
    pub positions: Vec<ConstellationPosition>,
}

impl NarrativeBrief {
    pub fn from_snapshot(snapshot: &SkySnapshot, local_date_time: &str) -> Self {
        let positions: Vec<ConstellationPosition> = snapshot
            .constellation_positions
            .iter()
            .take(MAX_NARRATIVE_CONSTELLATIONS)
            .cloned()
            .collect();

        Self {
            display_address: snapshot.context.display_address.clone(),
            local_date_time: local_date_time.to_string(),
            constellation_codes: positions.iter().map(|p| p.code.clone()).collect(),
            positions,
        }
    }

    /// Codes joined with ", ", or a localized "unknown" when none are visible.
    pub fn constellation_summary(&self, lang: &str) -> String {
        if self.constellation_codes.is_empty() {
            return unknown_label(lang).to_string();
        }
        self.constellation_codes.join(", ")
    }

    /// One `CODE az=..., alt=...` line per constellation, one decimal place.
    pub fn position_lines(&self) -> Vec<String> {
        self.positions
            .iter()
            .map(|p| {
                format!(
                    "{} az={:.1} alt={:.1}",
                    p.code,
                    p.mean_azimuth_deg.value(),
                    p.mean_altitude_deg.value()
                )
            })
            .collect()
    }

    /// Labeled place/time/constellation lines for a text prompt.
    pub fn context_text(&self, lang: &str) -> String {
        let (place, when, visible) = if is_korean(lang) {
            ("장소", "날짜/시각", "보이는 별자리")
        } else {
            ("Place", "Date/time", "Visible constellations")
        };
        format!(
            "{}: {}\n{}: {}\n{}: {}",
            place,
            self.display_address,
            when,
            self.local_date_time,
            visible,
            self.constellation_summary(lang)
        )
    }
}

fn is_korean(lang: &str) -> bool {
    lang.trim().eq_ignore_ascii_case("ko")
}

fn unknown_label(lang: &str) -> &'static str {
    if is_korean(lang) {
        "알 수 없음"
    } else {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ObserverContext;
    use chrono::{TimeZone, Utc};
    use qtty::Degrees;

    fn snapshot(codes: &[&str]) -> SkySnapshot {
        SkySnapshot {
            context: ObserverContext::new(
                35.1,
                129.0,
                Utc.with_ymd_and_hms(1995, 1, 14, 15, 0, 0).unwrap(),
                "부산광역시",
            ),
            stars: Vec::new(),
            visible_segments: Vec::new(),
            magnitude_limit: 6.5,
            constellation_positions: codes
                .iter()
                .enumerate()
                .map(|(i, code)| ConstellationPosition {
                    code: code.to_string(),
                    mean_azimuth_deg: Degrees::new(10.0 * i as f64 + 0.04),
                    mean_altitude_deg: Degrees::new(45.26),
                })
                .collect(),
        }
    }

    #[test]
    fn test_brief_caps_at_ten_codes() {
        let codes = ["And", "Ari", "Aur", "Cas", "Cep", "CMa", "CMi", "Gem", "Ori", "Per", "Tau", "Lep"];
        let brief = NarrativeBrief::from_snapshot(&snapshot(&codes), "1995-01-15 00:00");

        assert_eq!(brief.constellation_codes.len(), MAX_NARRATIVE_CONSTELLATIONS);
        assert_eq!(brief.constellation_codes[0], "And");
        assert_eq!(brief.constellation_codes[9], "Per");
        assert_eq!(brief.local_date_time, "1995-01-15 00:00");
        assert_eq!(brief.display_address, "부산광역시");
    }

    #[test]
    fn test_summary_when_empty() {
        let brief = NarrativeBrief::from_snapshot(&snapshot(&[]), "1995-01-15 00:00");
        assert_eq!(brief.constellation_summary("ko"), "알 수 없음");
        assert_eq!(brief.constellation_summary("en"), "unknown");
    }

    #[test]
    fn test_summary_and_position_lines() {
        let brief = NarrativeBrief::from_snapshot(&snapshot(&["Ori", "Tau"]), "1995-01-15 00:00");
        assert_eq!(brief.constellation_summary("en"), "Ori, Tau");
        assert_eq!(
            brief.position_lines(),
            vec!["Ori az=0.0 alt=45.3".to_string(), "Tau az=10.0 alt=45.3".to_string()]
        );
    }

    #[test]
    fn test_context_text_localized() {
        let brief = NarrativeBrief::from_snapshot(&snapshot(&["Ori"]), "1995-01-15 00:00");
        assert_eq!(
            brief.context_text("ko"),
            "장소: 부산광역시\n날짜/시각: 1995-01-15 00:00\n보이는 별자리: Ori"
        );
        assert!(brief.context_text("en").starts_with("Place: 부산광역시\n"));
    }
}
