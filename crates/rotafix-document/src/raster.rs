// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rasterisation: render one PDF page to a bitmap for OCR.
//
// The default implementation shells out to Poppler's `pdftoppm`, writing a
// single PNG into a scratch directory that is removed when the call returns.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::DynamicImage;
use rotafix_core::error::{Result, RotafixError};
use tracing::{debug, instrument};

use crate::image::processor::ImageProcessor;

/// Renders a page of a PDF on disk into an image.
pub trait PageRasterizer {
    /// Render `page_number` (1-indexed) of `pdf` at `dpi` dots per inch.
    fn rasterize(&self, pdf: &Path, page_number: u32, dpi: u32) -> Result<DynamicImage>;
}

/// [`PageRasterizer`] backed by the `pdftoppm` command-line tool.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    binary: PathBuf,
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

impl PdftoppmRasterizer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command(&self, pdf: &Path, page_number: u32, dpi: u32, prefix: &Path) -> Command {
        let page = page_number.to_string();
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-r")
            .arg(dpi.to_string())
            .arg("-f")
            .arg(&page)
            .arg("-l")
            .arg(&page)
            .arg("-singlefile")
            .arg("-png")
            .arg(pdf)
            .arg(prefix);
        cmd
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    #[instrument(skip(self, pdf), fields(pdf = %pdf.display()))]
    fn rasterize(&self, pdf: &Path, page_number: u32, dpi: u32) -> Result<DynamicImage> {
        let scratch = tempfile::tempdir()?;
        let prefix = scratch.path().join("page");

        let output = self
            .command(pdf, page_number, dpi, &prefix)
            .output()
            .map_err(|err| {
                RotafixError::RasterError(format!(
                    "failed to run {}: {}",
                    self.binary.display(),
                    err
                ))
            })?;

        if !output.status.success() {
            return Err(RotafixError::RasterError(format!(
                "{} exited with {} on page {}: {}",
                self.binary.display(),
                output.status,
                page_number,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        // -singlefile drops the page-number suffix pdftoppm normally appends.
        let image = ImageProcessor::open(prefix.with_extension("png"))?.into_dynamic();
        debug!(
            page_number,
            width = image.width(),
            height = image.height(),
            "Page rasterised"
        );
        Ok(image)
    }
}
