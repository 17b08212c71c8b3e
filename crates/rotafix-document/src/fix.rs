// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-file rotation correction.
//
// A `RotationFixer` walks every page of one document, asks its
// `CorrectionStrategy` what the rotation should be, applies the pages that
// change, and writes a corrected copy. The source file is only ever read.

use std::path::Path;

use rotafix_core::error::{Result, RotafixError};
use rotafix_core::progress::{EventKind, ProgressEvent, ProgressSink};
use rotafix_core::{FixConfig, FixOutcome, Rotation, RotationDecision, RotationPolicy};
use tracing::{info, instrument, warn};

use crate::pdf::RotationEditor;
use crate::raster::{PageRasterizer, PdftoppmRasterizer};
use crate::scan::osd::{OcrEngine, OrientationDetector};
use crate::scan::tesseract::TesseractEngine;

/// Decides the rotation a page should carry.
pub trait CorrectionStrategy {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Propose a rotation for `page_number` of the PDF at `source`, whose
    /// current effective rotation is `current`.
    fn decide(&self, source: &Path, page_number: u32, current: Rotation)
    -> Result<RotationDecision>;
}

/// Treats every non-zero rotation as a mistake and proposes upright.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResetStrategy;

impl CorrectionStrategy for ResetStrategy {
    fn name(&self) -> &'static str {
        "reset"
    }

    fn decide(
        &self,
        _source: &Path,
        page_number: u32,
        current: Rotation,
    ) -> Result<RotationDecision> {
        Ok(RotationDecision {
            page_number,
            current,
            proposed: Rotation::None,
            confidence: None,
        })
    }
}

/// Rasterises each page and stores whatever rotation OCR detects, even when
/// that re-introduces a non-zero value.
pub struct DetectStrategy<R, E> {
    rasterizer: R,
    detector: OrientationDetector<E>,
    dpi: u32,
}

impl<R: PageRasterizer, E: OcrEngine> DetectStrategy<R, E> {
    pub fn new(rasterizer: R, engine: E, dpi: u32) -> Self {
        Self {
            rasterizer,
            detector: OrientationDetector::new(engine),
            dpi,
        }
    }
}

impl DetectStrategy<PdftoppmRasterizer, TesseractEngine> {
    /// `pdftoppm` + `tesseract`, as named in `config`.
    pub fn from_config(config: &FixConfig) -> Self {
        Self::new(
            PdftoppmRasterizer::new(config.pdftoppm_path.clone()),
            TesseractEngine::from_config(config),
            config.dpi,
        )
    }
}

impl<R: PageRasterizer, E: OcrEngine> CorrectionStrategy for DetectStrategy<R, E> {
    fn name(&self) -> &'static str {
        "detect"
    }

    fn decide(
        &self,
        source: &Path,
        page_number: u32,
        current: Rotation,
    ) -> Result<RotationDecision> {
        let image = self.rasterizer.rasterize(source, page_number, self.dpi)?;
        let reading = self.detector.detect(&image);
        Ok(RotationDecision {
            page_number,
            current,
            proposed: reading.angle,
            confidence: Some(reading.confidence),
        })
    }
}

/// Applies a [`CorrectionStrategy`] to whole files.
pub struct RotationFixer {
    strategy: Box<dyn CorrectionStrategy>,
}

impl RotationFixer {
    pub fn new(strategy: impl CorrectionStrategy + 'static) -> Self {
        Self {
            strategy: Box::new(strategy),
        }
    }

    /// Build the fixer for the policy selected in `config`.
    pub fn from_config(config: &FixConfig) -> Self {
        match config.mode {
            RotationPolicy::Reset => Self::new(ResetStrategy),
            RotationPolicy::Detect => Self::new(DetectStrategy::from_config(config)),
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Correct `input` into `output`, reporting progress to `sink`.
    ///
    /// Errors never escape: they are reported and returned as
    /// [`FixOutcome::Failed`] so a batch can move on to the next file.
    #[instrument(skip_all, fields(
        input = %input.display(),
        output = %output.display(),
        strategy = self.strategy.name(),
    ))]
    pub fn fix_file(&self, input: &Path, output: &Path, sink: &dyn ProgressSink) -> FixOutcome {
        match self.try_fix_file(input, output, sink) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(%err, "File failed");
                sink.report(ProgressEvent::file(
                    input,
                    EventKind::Failed,
                    err.to_string(),
                ));
                FixOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    fn try_fix_file(
        &self,
        input: &Path,
        output: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<FixOutcome> {
        if input == output {
            return Err(RotafixError::OutputCollision(output.to_path_buf()));
        }

        let mut editor = RotationEditor::open(input)?;
        let mut changed = Vec::new();

        for (page_number, current) in editor.page_rotations()? {
            let Some(current) = current else {
                sink.report(ProgressEvent::page(
                    input,
                    page_number,
                    EventKind::PageSkipped,
                    "rotation is not a multiple of 90°",
                ));
                continue;
            };

            let decision = self.strategy.decide(input, page_number, current)?;
            if !decision.changes_page() {
                continue;
            }

            editor.set_rotation(page_number, decision.proposed)?;
            sink.report(ProgressEvent::page(
                input,
                page_number,
                EventKind::PageCorrected,
                describe(&decision),
            ));
            changed.push(page_number);
        }

        if changed.is_empty() {
            info!("No rotation corrections needed");
            sink.report(ProgressEvent::file(
                input,
                EventKind::NoChanges,
                "No rotation corrections needed",
            ));
            return Ok(FixOutcome::Unchanged);
        }

        editor.save(output)?;
        info!(pages = ?changed, "Rotation corrected");
        sink.report(ProgressEvent::file(
            input,
            EventKind::Fixed,
            format!("Fixed {} page(s): {:?}", changed.len(), changed),
        ));
        sink.report(ProgressEvent::file(
            input,
            EventKind::Saved,
            format!("Saved to: {}", output.display()),
        ));

        Ok(FixOutcome::Fixed {
            output: output.to_path_buf(),
            pages: changed,
        })
    }
}

fn describe(decision: &RotationDecision) -> String {
    let base = format!(
        "Correcting rotation from {} to {}",
        decision.current, decision.proposed
    );
    match decision.confidence {
        Some(confidence) => format!("{base} (confidence {confidence:.1})"),
        None => base,
    }
}
