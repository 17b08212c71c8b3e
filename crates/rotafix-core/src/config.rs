// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Run configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, RotafixError};
use crate::types::RotationPolicy;

/// Settings for a correction run.
///
/// Every field has a default, so a config file only needs to name the values
/// it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixConfig {
    /// Inserted between the file stem and its extension for output files.
    pub output_suffix: String,
    /// Which correction policy to apply.
    pub mode: RotationPolicy,
    /// Rasterisation resolution used before OCR.
    pub dpi: u32,
    /// Tesseract executable (name on `PATH` or absolute path).
    pub tesseract_path: PathBuf,
    /// Poppler `pdftoppm` executable.
    pub pdftoppm_path: PathBuf,
    /// Tesseract language code for the fallback text scan (engine default if unset).
    pub ocr_language: Option<String>,
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            output_suffix: "_fixed".to_string(),
            mode: RotationPolicy::Reset,
            dpi: 200,
            tesseract_path: PathBuf::from("tesseract"),
            pdftoppm_path: PathBuf::from("pdftoppm"),
            ocr_language: None,
        }
    }
}

impl FixConfig {
    /// Load a config from a JSON file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| {
            RotafixError::Config(format!("cannot read {}: {}", path.display(), err))
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), ?config, "Config loaded");
        config.validate()?;
        Ok(config)
    }

    /// Reject values that can never produce a usable run.
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(RotafixError::Config("dpi must be greater than 0".into()));
        }
        Ok(())
    }
}
