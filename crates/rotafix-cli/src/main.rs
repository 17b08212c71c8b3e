// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rotafix: batch correction of PDF page rotation.
//
// Entry point. Initialises logging, parses arguments, builds the run
// configuration, and hands the target to the batch driver.

mod batch;
mod console;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use rotafix_core::error::{Result, RotafixError};
use rotafix_core::{FixConfig, RotationPolicy};
use rotafix_document::RotationFixer;

use console::ConsoleSink;

const EXAMPLES: &str = "\
Examples:
  rotafix ~/Documents/scans
  rotafix input.pdf _fixed
  rotafix --mode detect --dpi 300 scans/";

#[derive(Debug, Parser)]
#[command(name = "rotafix")]
#[command(version)]
#[command(about = "Fix PDF page rotations for a single file or every PDF in a directory")]
#[command(after_help = EXAMPLES)]
struct Cli {
    /// PDF file, or directory whose PDFs should be corrected
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Inserted between file name and extension of each output [default: _fixed]
    #[arg(value_name = "OUTPUT_SUFFIX")]
    output_suffix: Option<String>,

    /// Correction policy: `reset` forces every page upright, `detect` asks OCR
    #[arg(long, value_name = "MODE")]
    mode: Option<RotationPolicy>,

    /// Rasterisation resolution for OCR detection [default: 200]
    #[arg(long)]
    dpi: Option<u32>,

    /// JSON settings file; command-line flags take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Tesseract executable
    #[arg(long, value_name = "PATH")]
    tesseract: Option<PathBuf>,

    /// pdftoppm executable
    #[arg(long, value_name = "PATH")]
    pdftoppm: Option<PathBuf>,

    /// OCR language for the fallback text scan (e.g. eng, deu+fra)
    #[arg(long, value_name = "LANG")]
    lang: Option<String>,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    fn resolve_config(&self) -> Result<FixConfig> {
        let mut config = match &self.config {
            Some(path) => FixConfig::load(path)?,
            None => FixConfig::default(),
        };

        if let Some(suffix) = &self.output_suffix {
            config.output_suffix = suffix.clone();
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(dpi) = self.dpi {
            config.dpi = dpi;
        }
        if let Some(tesseract) = &self.tesseract {
            config.tesseract_path = tesseract.clone();
        }
        if let Some(pdftoppm) = &self.pdftoppm {
            config.pdftoppm_path = pdftoppm.clone();
        }
        if let Some(lang) = &self.lang {
            config.ocr_language = Some(lang.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            err.print().ok();
            // --help and --version are not failures.
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let Some(path) = cli.path.clone() else {
        Cli::command().print_help().ok();
        return ExitCode::FAILURE;
    };

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(err) => {
            report_fatal(&err);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(?config, "Configuration resolved");

    let fixer = RotationFixer::from_config(&config);
    match batch::run(&path, &config.output_suffix, &fixer, &ConsoleSink::new()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            report_fatal(&err);
            ExitCode::FAILURE
        }
    }
}

/// The line printed when a run stops before or while scanning its target.
fn fatal_message(err: &RotafixError) -> String {
    match err {
        RotafixError::NoPdfFiles(_) => err.to_string(),
        _ => format!("Error: {err}"),
    }
}

/// Usage mistakes are the user's to fix and only get the message. Anything
/// else (an unreadable directory, say) is also logged as an error.
fn report_fatal(err: &RotafixError) {
    if !err.is_usage() {
        tracing::error!(%err, "Run aborted");
    }
    println!("{}", fatal_message(err));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("rotafix").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn positional_suffix_is_optional() {
        let cli = parse(&["scans"]);
        assert_eq!(cli.path, Some(PathBuf::from("scans")));
        assert_eq!(cli.resolve_config().unwrap().output_suffix, "_fixed");

        let cli = parse(&["scan.pdf", "_out"]);
        assert_eq!(cli.resolve_config().unwrap().output_suffix, "_out");
    }

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&["--mode", "detect", "--dpi", "300", "--lang", "deu", "scans"]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.mode, RotationPolicy::Detect);
        assert_eq!(config.dpi, 300);
        assert_eq!(config.ocr_language.as_deref(), Some("deu"));
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("rotafix.json");
        std::fs::write(&file, r#"{ "mode": "detect", "output_suffix": "_ocr", "dpi": 150 }"#)
            .unwrap();

        let cli = parse(&["--config", file.to_str().unwrap(), "--dpi", "400", "scans"]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.mode, RotationPolicy::Detect);
        assert_eq!(config.output_suffix, "_ocr");
        assert_eq!(config.dpi, 400);
    }

    #[test]
    fn zero_dpi_is_refused() {
        assert!(parse(&["--dpi", "0", "scans"]).resolve_config().is_err());
    }

    #[test]
    fn fatal_messages_match_console_contract() {
        assert_eq!(
            fatal_message(&RotafixError::NoPdfFiles(PathBuf::from("scans"))),
            "No PDF files found in scans"
        );
        assert_eq!(
            fatal_message(&RotafixError::NotAPdf(PathBuf::from("x.txt"))),
            "Error: x.txt is not a PDF file"
        );
    }

    #[test]
    fn unknown_mode_fails_to_parse() {
        assert!(Cli::try_parse_from(["rotafix", "--mode", "spin", "scans"]).is_err());
    }
}
