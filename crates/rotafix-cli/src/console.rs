// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Console progress: renders progress events as the human-readable report
// printed on stdout.

use rotafix_core::progress::{EventKind, ProgressEvent, ProgressSink};

/// Prints each event as one line of the user-facing report.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

/// The text printed for `event`.
///
/// A finished file renders as an empty line, separating files in the report.
pub fn render(event: &ProgressEvent) -> String {
    let page = event.page.unwrap_or_default();
    match event.kind {
        EventKind::Discovered => format!("{}\n", event.detail),
        EventKind::FileStarted => format!("Processing: {}", event.detail),
        EventKind::PageCorrected => format!("  Page {}: {}", page, event.detail),
        EventKind::PageSkipped => format!("  Page {}: left unchanged, {}", page, event.detail),
        EventKind::Fixed | EventKind::Saved => format!("  ✓ {}", event.detail),
        EventKind::NoChanges => format!("  ℹ {}", event.detail),
        EventKind::Failed => format!("  ✗ Error processing file: {}", event.detail),
        EventKind::FileFinished => String::new(),
        EventKind::Summary => format!("Summary: {}", event.detail),
    }
}

impl ProgressSink for ConsoleSink {
    fn report(&self, event: ProgressEvent) {
        println!("{}", render(&event));
    }
}
