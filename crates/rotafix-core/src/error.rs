// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for rotafix.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all rotafix operations.
#[derive(Debug, Error)]
pub enum RotafixError {
    // -- Usage errors (fatal, exit code 1) --
    #[error("{} is not a valid file or directory", .0.display())]
    TargetNotFound(PathBuf),

    #[error("{} is not a PDF file", .0.display())]
    NotAPdf(PathBuf),

    #[error("No PDF files found in {}", .0.display())]
    NoPdfFiles(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Per-file errors --
    #[error("output path {} would overwrite the input", .0.display())]
    OutputCollision(PathBuf),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("page rasterisation failed: {0}")]
    RasterError(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RotafixError {
    /// Whether this error is a usage problem that should stop the whole run,
    /// as opposed to a failure confined to a single file.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::TargetNotFound(_) | Self::NotAPdf(_) | Self::NoPdfFiles(_) | Self::Config(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RotafixError>;
