// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch driver: turns the command-line target into a list of PDFs, names
// each output, runs the fixer file by file, and tallies the results.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use rotafix_core::FixOutcome;
use rotafix_core::error::{Result, RotafixError};
use rotafix_core::progress::{EventKind, ProgressEvent, ProgressSink};
use rotafix_document::RotationFixer;
use tracing::{debug, info, instrument};

/// Anything that can correct one file into another.
pub trait FileFixer {
    fn fix_file(&self, input: &Path, output: &Path, sink: &dyn ProgressSink) -> FixOutcome;
}

impl FileFixer for RotationFixer {
    fn fix_file(&self, input: &Path, output: &Path, sink: &dyn ProgressSink) -> FixOutcome {
        RotationFixer::fix_file(self, input, output, sink)
    }
}

/// What the user pointed us at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A directory and the PDFs found directly inside it, sorted by name.
    Directory { dir: PathBuf, files: Vec<PathBuf> },
    /// A single PDF file.
    File(PathBuf),
}

/// Totals for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub fixed: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &FixOutcome) {
        self.processed += 1;
        if outcome.is_fixed() {
            self.fixed += 1;
        } else if outcome.is_failed() {
            self.failed += 1;
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} files, fixed {} files",
            self.processed, self.fixed
        )
    }
}

/// Classify `path` as a directory of PDFs or a single PDF.
pub fn resolve_target(path: &Path) -> Result<Target> {
    if path.is_dir() {
        let files = find_pdfs(path)?;
        if files.is_empty() {
            return Err(RotafixError::NoPdfFiles(path.to_path_buf()));
        }
        Ok(Target::Directory {
            dir: path.to_path_buf(),
            files,
        })
    } else if path.is_file() {
        if !has_pdf_extension(path) {
            return Err(RotafixError::NotAPdf(path.to_path_buf()));
        }
        Ok(Target::File(path.to_path_buf()))
    } else {
        Err(RotafixError::TargetNotFound(path.to_path_buf()))
    }
}

/// Regular files directly inside `dir` whose extension is exactly `pdf`.
///
/// The match is case-sensitive, so `SCAN.PDF` is not picked up here even
/// though it is accepted when named on its own.
pub fn find_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "pdf") {
            files.push(path);
        }
    }
    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "PDFs found");
    Ok(files)
}

/// `<stem><suffix>.<ext>` next to `input`.
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(input.file_stem().unwrap_or_default());
    name.push(suffix);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    input.with_file_name(name)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Correct everything `path` names.
///
/// Usage problems (missing target, wrong file type, empty directory) are
/// returned as errors before any file is touched. Per-file failures are only
/// counted.
#[instrument(skip_all, fields(path = %path.display(), suffix = %suffix))]
pub fn run(
    path: &Path,
    suffix: &str,
    fixer: &dyn FileFixer,
    sink: &dyn ProgressSink,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    match resolve_target(path)? {
        Target::Directory { dir, files } => {
            sink.report(ProgressEvent::file(
                &dir,
                EventKind::Discovered,
                format!("Found {} PDF file(s) in {}", files.len(), dir.display()),
            ));
            for file in &files {
                summary.record(&process_one(file, suffix, fixer, sink));
            }
            sink.report(ProgressEvent::file(
                &dir,
                EventKind::Summary,
                summary.to_string(),
            ));
        }
        Target::File(file) => {
            summary.record(&process_one(&file, suffix, fixer, sink));
        }
    }

    info!(
        processed = summary.processed,
        fixed = summary.fixed,
        failed = summary.failed,
        "Batch complete"
    );
    Ok(summary)
}

fn process_one(
    input: &Path,
    suffix: &str,
    fixer: &dyn FileFixer,
    sink: &dyn ProgressSink,
) -> FixOutcome {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    sink.report(ProgressEvent::file(input, EventKind::FileStarted, name));

    let outcome = fixer.fix_file(input, &output_path(input, suffix), sink);

    let status = match &outcome {
        FixOutcome::Fixed { .. } => "fixed",
        FixOutcome::Unchanged => "unchanged",
        FixOutcome::Failed { .. } => "failed",
    };
    sink.report(ProgressEvent::file(input, EventKind::FileFinished, status));
    outcome
}
