// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tesseract adapter: drives the `tesseract` command-line tool as the
// [`OcrEngine`] behind orientation detection.
//
// Each call writes the page image as PNG into a scratch directory and reads
// the engine's report from stdout:
//
// - `--psm 0` prints the OSD report (`Rotate:`, `Orientation confidence:`).
// - `--psm 3 ... tsv` prints one row per layout element; column 11 (`conf`)
//   holds the word confidence, or -1 for non-word rows.

use std::path::PathBuf;
use std::process::Command;

use image::DynamicImage;
use rotafix_core::FixConfig;
use rotafix_core::error::{Result, RotafixError};
use tracing::{debug, instrument};

use crate::image::processor::save_png;
use crate::scan::osd::OcrEngine;

/// Index of the `conf` column in Tesseract's TSV output.
const TSV_CONF_COLUMN: usize = 10;

/// [`OcrEngine`] that runs the Tesseract binary.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
    /// Language for the text pass; OSD always uses Tesseract's own data.
    language: Option<String>,
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TesseractEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            language: None,
        }
    }

    pub fn from_config(config: &FixConfig) -> Self {
        Self {
            binary: config.tesseract_path.clone(),
            language: config.ocr_language.clone(),
        }
    }

    /// Set the recognition language (e.g. `"eng"`, `"deu+fra"`).
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    fn text_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(language) = &self.language {
            args.push("-l".to_string());
            args.push(language.clone());
        }
        args.extend(["--psm", "3", "tsv"].map(String::from));
        args
    }

    /// Run tesseract on `image` and return its stdout.
    fn run(&self, image: &DynamicImage, args: &[String]) -> Result<String> {
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("page.png");
        save_png(image, &input)?;

        let output = Command::new(&self.binary)
            .arg(&input)
            .arg("stdout")
            .args(args)
            .output()
            .map_err(|err| {
                RotafixError::OcrError(format!(
                    "failed to run {}: {}",
                    self.binary.display(),
                    err
                ))
            })?;

        if !output.status.success() {
            return Err(RotafixError::OcrError(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OcrEngine for TesseractEngine {
    #[instrument(skip_all)]
    fn osd(&self, image: &DynamicImage) -> Result<String> {
        self.run(image, &["--psm".to_string(), "0".to_string()])
    }

    #[instrument(skip_all, fields(language = ?self.language))]
    fn word_confidences(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        let tsv = self.run(image, &self.text_args())?;
        let confidences = parse_tsv_confidences(&tsv);
        debug!(rows = confidences.len(), "TSV confidences parsed");
        Ok(confidences)
    }
}

/// Collect the `conf` column of a Tesseract TSV report.
///
/// The header row and any row whose confidence does not parse are ignored.
/// Sentinel values are kept; filtering is the caller's business.
pub fn parse_tsv_confidences(tsv: &str) -> Vec<f32> {
    tsv.lines()
        .filter_map(|row| row.split('\t').nth(TSV_CONF_COLUMN))
        .filter_map(|conf| conf.trim().parse::<f32>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
        1\t1\t0\t0\t0\t0\t0\t0\t1700\t2200\t-1\t\n\
        4\t1\t1\t1\t1\t0\t120\t96\t800\t40\t-1\t\n\
        5\t1\t1\t1\t1\t1\t120\t96\t200\t40\t96.541817\tInvoice\n\
        5\t1\t1\t1\t1\t2\t340\t96\t120\t40\t91\tNo.\n";

    #[test]
    fn parses_conf_column_keeping_sentinels() {
        let confidences = parse_tsv_confidences(TSV);
        assert_eq!(confidences.len(), 4);
        assert_eq!(confidences[0], -1.0);
        assert!((confidences[2] - 96.541817).abs() < 1e-4);
        assert_eq!(confidences[3], 91.0);
    }

    #[test]
    fn empty_report_has_no_confidences() {
        assert!(parse_tsv_confidences("").is_empty());
    }

    #[test]
    fn language_goes_before_page_mode() {
        let engine = TesseractEngine::new("tesseract").with_language("deu");
        assert_eq!(engine.text_args(), vec!["-l", "deu", "--psm", "3", "tsv"]);
        assert_eq!(
            TesseractEngine::default().text_args(),
            vec!["--psm", "3", "tsv"]
        );
    }

    #[test]
    fn config_supplies_binary_and_language() {
        let config = FixConfig {
            tesseract_path: PathBuf::from("/opt/tess/bin/tesseract"),
            ocr_language: Some("eng".into()),
            ..FixConfig::default()
        };
        let engine = TesseractEngine::from_config(&config);
        assert_eq!(engine.binary, PathBuf::from("/opt/tess/bin/tesseract"));
        assert_eq!(engine.language.as_deref(), Some("eng"));
    }

    #[test]
    fn missing_binary_is_an_ocr_error() {
        let engine = TesseractEngine::new("/nonexistent/tesseract");
        let image = DynamicImage::new_rgb8(2, 2);
        assert!(matches!(engine.osd(&image), Err(RotafixError::OcrError(_))));
    }
}
