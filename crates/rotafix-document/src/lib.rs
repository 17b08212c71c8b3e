// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rotafix-document: Document processing for rotafix.
//
// Provides page rotation editing on existing PDFs, page rasterisation for OCR,
// right-angle image rotation, OCR-based orientation detection, and the
// per-file fixer that ties them together.

pub mod fix;
pub mod image;
pub mod pdf;
pub mod raster;
pub mod scan;

// Re-export the primary structs so callers can use `rotafix_document::RotationFixer` etc.
pub use fix::{CorrectionStrategy, DetectStrategy, ResetStrategy, RotationFixer};
pub use image::processor::ImageProcessor;
pub use pdf::rotation::RotationEditor;
pub use raster::{PageRasterizer, PdftoppmRasterizer};
pub use scan::osd::{DetectionMethod, OcrEngine, OrientationDetector, OrientationReading};
pub use scan::tesseract::TesseractEngine;
