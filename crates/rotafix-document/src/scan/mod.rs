// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline: orientation detection on rasterised pages and the
// Tesseract engine that backs it.

pub mod osd;
pub mod tesseract;

pub use osd::{OcrEngine, OrientationDetector};
pub use tesseract::TesseractEngine;
