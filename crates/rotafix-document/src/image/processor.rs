// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: right-angle rotation and encoding of rasterised pages
// using the `image` crate.

use std::path::Path;

use image::{DynamicImage, ImageFormat};
use rotafix_core::Rotation;
use rotafix_core::error::{Result, RotafixError};
use tracing::{debug, instrument};

/// Wrapper around a single in-memory page image.
///
/// Transformations consume `self` and return a new `ImageProcessor`, so
/// calls chain:
///
/// ```ignore
/// let upright = ImageProcessor::open("page.png")?
///     .rotate(Rotation::Clockwise90)
///     .into_dynamic();
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            RotafixError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        debug!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Rotate clockwise by `rotation`.
    ///
    /// Quarter turns swap width and height, so the canvas always holds the
    /// whole page and nothing is cropped.
    pub fn rotate(self, rotation: Rotation) -> Self {
        let image = match rotation {
            Rotation::None => self.image,
            Rotation::Clockwise90 => self.image.rotate90(),
            Rotation::Upside => self.image.rotate180(),
            Rotation::Clockwise270 => self.image.rotate270(),
        };
        Self { image }
    }
}

/// Write any `DynamicImage` as PNG without taking ownership of it.
pub fn save_png(image: &DynamicImage, path: impl AsRef<Path>) -> Result<()> {
    image
        .save_with_format(path.as_ref(), ImageFormat::Png)
        .map_err(|err| {
            RotafixError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
}
