// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Orientation detection for rasterised pages.
//
// The OCR engine's orientation-and-script detection (OSD) report is asked
// first. When that fails (too little text, missing OSD data, engine error) the
// detector falls back to brute force: OCR the page in each of the four
// orientations and keep the one whose words were recognised with the highest
// mean confidence.

use image::DynamicImage;
use rotafix_core::Rotation;
use rotafix_core::error::{Result, RotafixError};
use tracing::{debug, instrument};

use crate::image::processor::ImageProcessor;

/// The black-box OCR engine behind orientation detection.
pub trait OcrEngine {
    /// Raw textual OSD report for `image`.
    fn osd(&self, image: &DynamicImage) -> Result<String>;

    /// Per-word recognition confidences for `image`, in percent.
    ///
    /// Entries for non-word layout rows carry the engine's `-1` sentinel and
    /// are passed through unfiltered.
    fn word_confidences(&self, image: &DynamicImage) -> Result<Vec<f32>>;
}

/// Which path produced an [`OrientationReading`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    Osd,
    ConfidenceScan,
}

/// Detected rotation for one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationReading {
    /// Clockwise rotation that makes the page upright.
    pub angle: Rotation,
    /// Confidence in percent. OSD and the scan use different scales.
    pub confidence: f32,
    pub method: DetectionMethod,
}

/// Turns page images into rotation readings using an [`OcrEngine`].
pub struct OrientationDetector<E> {
    engine: E,
}

impl<E: OcrEngine> OrientationDetector<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Detect the page orientation. Never fails: the worst case is an
    /// upright reading with zero confidence.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn detect(&self, image: &DynamicImage) -> OrientationReading {
        match self
            .engine
            .osd(image)
            .and_then(|report| parse_osd_report(&report))
        {
            Ok((angle, confidence)) => {
                debug!(%angle, confidence, "OSD reading");
                OrientationReading {
                    angle,
                    confidence,
                    method: DetectionMethod::Osd,
                }
            }
            Err(err) => {
                debug!(%err, "OSD failed, scanning all orientations");
                self.scan(image)
            }
        }
    }

    /// OCR the image once per candidate orientation and keep the best.
    ///
    /// Each candidate is tried by turning the image clockwise by that angle,
    /// which is what a viewer does when the page carries it as `/Rotate`.
    pub fn scan(&self, image: &DynamicImage) -> OrientationReading {
        let scores = Rotation::ALL.iter().map(|&candidate| {
            let turned = ImageProcessor::from_dynamic(image.clone()).rotate(candidate);
            let score = match self.engine.word_confidences(turned.as_dynamic()) {
                Ok(values) => Some(mean_confidence(&values)),
                Err(err) => {
                    debug!(%candidate, %err, "Orientation candidate skipped");
                    None
                }
            };
            (candidate, score)
        });

        let (angle, confidence) = select_best_angle(scores);
        debug!(%angle, confidence, "Confidence scan result");
        OrientationReading {
            angle,
            confidence,
            method: DetectionMethod::ConfidenceScan,
        }
    }
}

/// Pull `Rotate:` and `Orientation confidence:` out of an OSD report.
///
/// The rotation is mandatory; a report without a confidence line reads as
/// zero confidence.
pub fn parse_osd_report(report: &str) -> Result<(Rotation, f32)> {
    let mut angle = None;
    let mut confidence = 0.0;

    for line in report.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("Rotate:") {
            let degrees: i64 = value.trim().parse().map_err(|_| {
                RotafixError::OcrError(format!("unreadable OSD rotation '{}'", value.trim()))
            })?;
            angle = Some(Rotation::from_degrees(degrees).ok_or_else(|| {
                RotafixError::OcrError(format!("OSD rotation {} is not a right angle", degrees))
            })?);
        } else if let Some(value) = line.strip_prefix("Orientation confidence:") {
            confidence = value.trim().parse().map_err(|_| {
                RotafixError::OcrError(format!("unreadable OSD confidence '{}'", value.trim()))
            })?;
        }
    }

    angle
        .map(|angle| (angle, confidence))
        .ok_or_else(|| RotafixError::OcrError("OSD report has no Rotate line".into()))
}

/// Arithmetic mean of the non-negative confidences; 0 when there are none.
pub fn mean_confidence(values: &[f32]) -> f32 {
    let (sum, count) = values
        .iter()
        .filter(|value| **value >= 0.0)
        .fold((0.0f32, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 { 0.0 } else { sum / count as f32 }
}

/// Pick the candidate with the strictly highest score.
///
/// Candidates are visited in iteration order and a later one only wins with
/// a higher score, so ties go to the earliest. `None` scores are failed
/// candidates and never win. With no successful candidate the result is
/// upright with zero confidence.
pub fn select_best_angle(
    scores: impl IntoIterator<Item = (Rotation, Option<f32>)>,
) -> (Rotation, f32) {
    let mut best: Option<(Rotation, f32)> = None;
    for (angle, score) in scores {
        let Some(score) = score else { continue };
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((angle, score)),
        }
    }
    best.unwrap_or((Rotation::None, 0.0))
}
