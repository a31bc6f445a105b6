//! First pixel whose reference colour the test side's palette pair cannot
//! explain.

use std::fmt;

use tracing::debug;

use crate::{Candidate, EMPHASIS_MASK, INDEX_MASK, ReverseMap, Rgb};

/// Heuristic label for a mismatching pixel.
///
/// The label only says whether the test side's index appears among the
/// candidates at all. When several candidates share a colour it cannot tell
/// which component actually went wrong; see [`FirstMismatch::is_ambiguous`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchReason {
    /// The test index is not among the candidate indices.
    PaletteIndex,
    /// The index matches a candidate but the emphasis bits do not.
    EmphasisBits,
}

impl MismatchReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PaletteIndex => "palette_index",
            Self::EmphasisBits => "emphasis_bits",
        }
    }
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the test side's pair against the reference colour's candidates.
///
/// Returns `None` when the pair is itself a candidate.
pub fn classify(candidates: &[Candidate], actual: Candidate) -> Option<MismatchReason> {
    if candidates.contains(&actual) {
        None
    } else if candidates.iter().any(|c| c.index == actual.index) {
        Some(MismatchReason::EmphasisBits)
    } else {
        Some(MismatchReason::PaletteIndex)
    }
}

/// The first unexplained pixel in a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstMismatch {
    pub frame: u32,
    pub pixel_index: usize,
    pub x: usize,
    pub y: usize,
    /// Reference colour at the pixel.
    pub rgb: Rgb,
    /// Every pair that produces `rgb`.
    pub candidates: Vec<Candidate>,
    /// Test side's pair, masked to 6 index bits and 3 emphasis bits.
    pub actual: Candidate,
    pub reason: MismatchReason,
}

impl FirstMismatch {
    /// Whether more than one pair produces the reference colour.
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }
}

/// Pixel classification tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MismatchCounters {
    /// Reference colours no pair produces.
    pub unknown_colors: usize,
    pub index_mismatches: usize,
    pub emphasis_mismatches: usize,
}

impl MismatchCounters {
    fn record(&mut self, reason: MismatchReason) {
        match reason {
            MismatchReason::PaletteIndex => self.index_mismatches += 1,
            MismatchReason::EmphasisBits => self.emphasis_mismatches += 1,
        }
    }

    /// Total pixels the reverse map could not reconcile.
    pub const fn total(&self) -> usize {
        self.unknown_colors + self.index_mismatches + self.emphasis_mismatches
    }
}

impl fmt::Display for MismatchCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown_colors={}, idx_mismatches={}, emph_mismatches={}",
            self.unknown_colors, self.index_mismatches, self.emphasis_mismatches
        )
    }
}

/// Result of scanning one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteScan {
    pub frame: u32,
    pub first: Option<FirstMismatch>,
    /// Counts observed strictly before `first` (the whole frame if none).
    pub before_first: MismatchCounters,
    /// Counts over the whole frame, including `first`.
    pub totals: MismatchCounters,
}

impl PaletteScan {
    pub const fn is_match(&self) -> bool {
        self.first.is_none()
    }
}

/// Scan a frame row-major for the first mismatching pixel.
///
/// `rgb24` is the reference frame; `indices` and `emphasis` are the test
/// side's planes, one byte per pixel. The scan covers
/// `min(indices.len(), emphasis.len(), rgb24.len() / 3)` pixels and keeps
/// going after the first mismatch to fill in `totals`.
pub fn scan_frame(
    frame: u32,
    width: usize,
    rgb24: &[u8],
    indices: &[u8],
    emphasis: &[u8],
    map: &ReverseMap,
) -> PaletteScan {
    let pixels = indices.len().min(emphasis.len()).min(rgb24.len() / 3);
    let mut first = None;
    let mut before_first = MismatchCounters::default();
    let mut totals = MismatchCounters::default();

    for (pixel, (&idx, &emph)) in indices.iter().zip(emphasis).take(pixels).enumerate() {
        let Some(rgb) = Rgb::from_rgb24(rgb24, pixel) else {
            break;
        };
        let candidates = map.candidates(rgb);
        if candidates.is_empty() {
            totals.unknown_colors += 1;
            if first.is_none() {
                before_first.unknown_colors += 1;
            }
            continue;
        }

        let actual = Candidate {
            index: idx & INDEX_MASK,
            emphasis: emph & EMPHASIS_MASK,
        };
        let Some(reason) = classify(candidates, actual) else {
            continue;
        };
        totals.record(reason);
        if first.is_none() {
            let (x, y) = if width == 0 {
                (pixel, 0)
            } else {
                (pixel % width, pixel / width)
            };
            debug!(frame, pixel, x, y, %reason, "first palette mismatch");
            first = Some(FirstMismatch {
                frame,
                pixel_index: pixel,
                x,
                y,
                rgb,
                candidates: candidates.to_vec(),
                actual,
                reason,
            });
        }
    }

    PaletteScan {
        frame,
        first,
        before_first,
        totals,
    }
}
