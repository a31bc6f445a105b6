//! nesdiff - differential testing for NES emulators
//!
//! Compares a reference emulator's hardware event traces and frame dumps
//! against those of the emulator under test, and reports where they first
//! disagree.
//!
//! # Example
//!
//! ```ignore
//! use nesdiff::{TraceConfig, TraceProfile, compare_traces};
//!
//! let config = TraceConfig::new(TraceProfile::PpuReg);
//! let outcome = compare_traces(&mut std::io::stdout(), "mesen.log".as_ref(), "nesium.log".as_ref(), &config)?;
//! ```

// Re-export from sub-crates
pub use nesdiff_frame::{
    BoundingBox, DiffFootprint, DumpFormat, FrameDiffStats, FrameError, FrameGeometry, FrameList,
    compare_masks, compute_frame_diff, read_dump,
};
pub use nesdiff_palette::{
    Candidate, FirstMismatch, MismatchCounters, MismatchReason, PaletteScan, ReverseMap, Rgb,
    scan_frame,
};
pub use nesdiff_trace::{
    FieldSet, TraceComparison, TraceError, TraceEvent, TraceLog, TraceProfile, compare_events,
    report::SideLabels,
};

pub mod metrics;
mod pipeline;
pub mod report;

pub use pipeline::*;

use thiserror::Error;

/// Top-level errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Trace(#[from] TraceError),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
