// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rotafix: Core types, configuration, progress reporting, and error
// definitions shared across all crates.

pub mod config;
pub mod error;
pub mod progress;
pub mod types;

pub use config::FixConfig;
pub use error::RotafixError;
pub use progress::{CollectingSink, EventKind, ProgressEvent, ProgressSink};
pub use types::*;
