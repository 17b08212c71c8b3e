// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progress reporting: the processing code emits structured events into a
// sink instead of printing, so the console front-end is just one consumer.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A directory was scanned for input files (file is the directory).
    Discovered,
    /// A file is about to be processed.
    FileStarted,
    /// A page's rotation was changed in memory.
    PageCorrected,
    /// A page was left as-is (detail says why, e.g. malformed value).
    PageSkipped,
    /// The corrected pages of a file (detail lists them).
    Fixed,
    /// The corrected document was written.
    Saved,
    /// Every page was already correct; nothing written.
    NoChanges,
    /// Processing of the file failed.
    Failed,
    /// A file is done, whatever the outcome.
    FileFinished,
    /// Totals for a directory run (file is the directory).
    Summary,
}

/// One progress record: `{file, page, event, detail}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub file: PathBuf,
    /// 1-indexed page number, for page-level events.
    pub page: Option<u32>,
    pub kind: EventKind,
    pub detail: String,
}

impl ProgressEvent {
    pub fn file(file: impl AsRef<Path>, kind: EventKind, detail: impl Into<String>) -> Self {
        Self {
            file: file.as_ref().to_path_buf(),
            page: None,
            kind,
            detail: detail.into(),
        }
    }

    pub fn page(
        file: impl AsRef<Path>,
        page: u32,
        kind: EventKind,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            page: Some(page),
            ..Self::file(file, kind, detail)
        }
    }
}

/// Receiver of progress events.
pub trait ProgressSink {
    fn report(&self, event: ProgressEvent);
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: RefCell<Vec<ProgressEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.borrow().clone()
    }

    /// Events of one kind, in arrival order.
    pub fn of_kind(&self, kind: EventKind) -> Vec<ProgressEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.kind == kind)
            .cloned()
            .collect()
    }
}

impl ProgressSink for CollectingSink {
    fn report(&self, event: ProgressEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl<S: ProgressSink + ?Sized> ProgressSink for &S {
    fn report(&self, event: ProgressEvent) {
        (**self).report(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_filters_by_kind() {
        let sink = CollectingSink::new();
        sink.report(ProgressEvent::file("a.pdf", EventKind::FileStarted, ""));
        sink.report(ProgressEvent::page("a.pdf", 2, EventKind::PageCorrected, "90° -> 0°"));
        sink.report(ProgressEvent::file("a.pdf", EventKind::Saved, "a_fixed.pdf"));

        let corrected = sink.of_kind(EventKind::PageCorrected);
        assert_eq!(corrected.len(), 1);
        assert_eq!(corrected[0].page, Some(2));
        assert_eq!(sink.events().len(), 3);
    }
}
