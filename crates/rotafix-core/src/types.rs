// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for rotafix.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A page rotation, as carried by the PDF `/Rotate` page attribute.
///
/// PDF only permits multiples of 90; anything else is rejected at the edges
/// by [`Rotation::from_degrees`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Upside,
    Clockwise270,
}

impl Rotation {
    /// Candidate order used wherever all four orientations are tried in turn.
    pub const ALL: [Rotation; 4] = [
        Rotation::None,
        Rotation::Clockwise90,
        Rotation::Upside,
        Rotation::Clockwise270,
    ];

    /// Normalise an arbitrary degree value (`-90`, `450`, ...) into a rotation.
    ///
    /// Returns `None` when the value is not a multiple of 90.
    pub fn from_degrees(degrees: i64) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::None),
            90 => Some(Self::Clockwise90),
            180 => Some(Self::Upside),
            270 => Some(Self::Clockwise270),
            _ => None,
        }
    }

    pub fn degrees(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Clockwise90 => 90,
            Self::Upside => 180,
            Self::Clockwise270 => 270,
        }
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// How a document's rotation values get corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    /// Any non-zero `/Rotate` is treated as a mistake and reset to 0.
    #[default]
    Reset,
    /// Each page is rasterised and OCR decides the rotation to store.
    Detect,
}

impl std::str::FromStr for RotationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reset" => Ok(Self::Reset),
            "detect" => Ok(Self::Detect),
            other => Err(format!("unknown rotation mode '{other}' (expected reset or detect)")),
        }
    }
}

/// A proposed rotation for one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationDecision {
    /// 1-indexed page number.
    pub page_number: u32,
    pub current: Rotation,
    pub proposed: Rotation,
    /// OCR confidence in percent, when the proposal came from detection.
    pub confidence: Option<f32>,
}

impl RotationDecision {
    /// Whether applying this decision alters the page.
    pub fn changes_page(&self) -> bool {
        self.current != self.proposed
    }
}

/// Result of processing a single file.
#[derive(Debug, Clone, PartialEq)]
pub enum FixOutcome {
    /// At least one page changed; the corrected copy was written to `output`.
    Fixed { output: PathBuf, pages: Vec<u32> },
    /// Every page was already correct, nothing was written.
    Unchanged,
    /// Processing failed; no guarantee an output file exists.
    Failed { reason: String },
}

impl FixOutcome {
    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_normalises_out_of_range_values() {
        assert_eq!(Rotation::from_degrees(-90), Some(Rotation::Clockwise270));
        assert_eq!(Rotation::from_degrees(450), Some(Rotation::Clockwise90));
        assert_eq!(Rotation::from_degrees(360), Some(Rotation::None));
        assert_eq!(Rotation::from_degrees(45), None);
    }

    #[test]
    fn candidate_order_starts_upright() {
        let degrees: Vec<i64> = Rotation::ALL.iter().map(|r| r.degrees()).collect();
        assert_eq!(degrees, vec![0, 90, 180, 270]);
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Detect".parse::<RotationPolicy>(), Ok(RotationPolicy::Detect));
        assert_eq!("reset".parse::<RotationPolicy>(), Ok(RotationPolicy::Reset));
        assert!("spin".parse::<RotationPolicy>().is_err());
    }

    #[test]
    fn decision_reports_change() {
        let decision = RotationDecision {
            page_number: 1,
            current: Rotation::Upside,
            proposed: Rotation::None,
            confidence: None,
        };
        assert!(decision.changes_page());
    }
}
