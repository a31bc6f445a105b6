//! Frame dump comparison.
//!
//! Loads raw framebuffer dumps (`.rgb24`, `.idx8`, `.emph8`) and 1bpp
//! difference masks, then aggregates per-pixel difference statistics.

mod frames;
mod geometry;
mod load;
mod mask;
mod stats;

pub use frames::*;
pub use geometry::*;
pub use load::*;
pub use mask::*;
pub use stats::*;

use std::path::PathBuf;

use thiserror::Error;

/// Frame loading and configuration errors.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("missing frame dump: {}", .0.display())]
    Missing(PathBuf),
    #[error("{}: size {actual} does not match expected {expected} bytes", path.display())]
    SizeMismatch {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
    #[error("buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("inputs differ in size: {left} vs {right} bytes")]
    PairedSizeMismatch { left: usize, right: usize },
    #[error("invalid frame list '{input}': {reason}")]
    InvalidFrames { input: String, reason: String },
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, FrameError>;
