//! Trace comparison for emulator differential testing.
//!
//! Parses `TAG|key=value|...` trace logs from a reference emulator and the
//! emulator under test, normalizes both vocabularies onto one event model,
//! and locates the first event at which a selected field set disagrees.
//!
//! # Example
//!
//! ```ignore
//! use nesdiff_trace::{FieldSet, TraceLog, TraceProfile, compare_events};
//!
//! let profile = TraceProfile::PpuReg;
//! let reference = TraceLog::load("mesen_ppu.log".as_ref(), profile)?;
//! let test = TraceLog::load("nesium_ppu.log".as_ref(), profile)?;
//! let result = compare_events(&reference.events, &test.events, &FieldSet::strict_timing());
//! ```

mod compare;
mod event;
mod line;
mod parse;
mod profile;
pub mod report;

pub use compare::*;
pub use event::*;
pub use line::*;
pub use parse::*;
pub use profile::*;

use std::path::PathBuf;

use thiserror::Error;

/// Trace loading and configuration errors.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("missing trace file: {}", .0.display())]
    Missing(PathBuf),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported field '{0}' (supported: {supported})", supported = Field::supported_list())]
    UnknownField(String),
    #[error("at least one comparison field is required")]
    NoFields,
}

pub type Result<T> = std::result::Result<T, TraceError>;

#[cfg(test)]
mod tests;
