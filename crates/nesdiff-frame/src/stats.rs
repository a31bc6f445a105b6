//! Per-pixel difference statistics.

use std::cmp::Reverse;
use std::fmt;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{DumpFormat, FrameError, FrameGeometry, Result};

/// Entries kept in each ranked list.
pub const TOP_N: usize = 10;

/// Signed per-channel delta, second input minus first.
pub type Delta = [i16; 3];

/// Inclusive bounding box of differing pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl BoundingBox {
    const fn point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn extend(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x={}..{}, y={}..{}",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}

/// Where differing pixels fall: count, bbox, per-row and per-column counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffFootprint {
    pub geometry: FrameGeometry,
    pub pixels_diff: usize,
    pub bbox: Option<BoundingBox>,
    row_counts: Vec<usize>,
    col_counts: Vec<usize>,
}

impl DiffFootprint {
    pub fn new(geometry: FrameGeometry) -> Self {
        Self {
            geometry,
            pixels_diff: 0,
            bbox: None,
            row_counts: vec![0; geometry.height],
            col_counts: vec![0; geometry.width],
        }
    }

    /// Record one differing pixel by row-major index.
    pub fn record(&mut self, pixel: usize) {
        let (x, y) = self.geometry.coords(pixel);
        self.pixels_diff += 1;
        self.row_counts[y] += 1;
        self.col_counts[x] += 1;
        match &mut self.bbox {
            Some(bbox) => bbox.extend(x, y),
            None => self.bbox = Some(BoundingBox::point(x, y)),
        }
    }

    #[must_use]
    pub const fn pixels_total(&self) -> usize {
        self.geometry.pixel_count()
    }

    /// Percentage of differing pixels, 0 for an empty frame.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pct_diff(&self) -> f64 {
        let total = self.pixels_total();
        if total == 0 {
            return 0.0;
        }
        self.pixels_diff as f64 / total as f64 * 100.0
    }

    #[must_use]
    pub fn row_counts(&self) -> &[usize] {
        &self.row_counts
    }

    #[must_use]
    pub fn col_counts(&self) -> &[usize] {
        &self.col_counts
    }

    pub fn rows_with_diff(&self) -> usize {
        self.row_counts.iter().filter(|&&c| c > 0).count()
    }

    /// `(y, count)` pairs, busiest first.
    pub fn top_rows(&self, n: usize) -> Vec<(usize, usize)> {
        rank_counts(&self.row_counts, n)
    }

    /// `(x, count)` pairs, busiest first.
    pub fn top_cols(&self, n: usize) -> Vec<(usize, usize)> {
        rank_counts(&self.col_counts, n)
    }
}

/// Nonzero `(index, count)` entries by descending count, then ascending index.
fn rank_counts(counts: &[usize], n: usize) -> Vec<(usize, usize)> {
    let mut ranked: Vec<(usize, usize)> = counts
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, count)| count > 0)
        .collect();
    ranked.sort_by_key(|&(index, count)| (Reverse(count), index));
    ranked.truncate(n);
    ranked
}

/// Difference statistics for one pair of RGB24 frames.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameDiffStats {
    pub frame: u32,
    pub footprint: DiffFootprint,
    /// Mean absolute delta per channel over differing pixels.
    pub mean_abs: [f64; 3],
    /// Max absolute delta per channel.
    pub max_abs: [u8; 3],
    /// Mean signed delta per channel over differing pixels.
    pub mean_delta: [f64; 3],
    /// Most frequent delta triples; ties keep first-seen order.
    pub top_deltas: Vec<(Delta, usize)>,
    pub top_rows: Vec<(usize, usize)>,
    pub top_cols: Vec<(usize, usize)>,
}

impl FrameDiffStats {
    #[must_use]
    pub const fn pixels_total(&self) -> usize {
        self.footprint.pixels_total()
    }

    #[must_use]
    pub const fn pixels_diff(&self) -> usize {
        self.footprint.pixels_diff
    }

    #[must_use]
    pub fn pct_diff(&self) -> f64 {
        self.footprint.pct_diff()
    }

    #[must_use]
    pub const fn bbox(&self) -> Option<BoundingBox> {
        self.footprint.bbox
    }

    #[must_use]
    pub const fn is_identical(&self) -> bool {
        self.footprint.pixels_diff == 0
    }
}

/// Compare two RGB24 frames of `geometry`.
#[allow(clippy::cast_precision_loss)]
pub fn compute_frame_diff(
    frame: u32,
    geometry: FrameGeometry,
    a: &[u8],
    b: &[u8],
) -> Result<FrameDiffStats> {
    if a.len() != b.len() {
        return Err(FrameError::PairedSizeMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let expected = geometry.byte_len(DumpFormat::Rgb24);
    if a.len() != expected {
        return Err(FrameError::BufferSize {
            expected,
            actual: a.len(),
        });
    }

    let mut footprint = DiffFootprint::new(geometry);
    let mut sum_abs = [0u64; 3];
    let mut sum_signed = [0i64; 3];
    let mut max_abs = [0u8; 3];
    // delta -> (count, first seen)
    let mut delta_counts: FxHashMap<Delta, (usize, usize)> = FxHashMap::default();

    for (pixel, (pa, pb)) in a.chunks_exact(3).zip(b.chunks_exact(3)).enumerate() {
        let delta: Delta = [0, 1, 2].map(|c| i16::from(pb[c]) - i16::from(pa[c]));
        if delta == [0; 3] {
            continue;
        }
        footprint.record(pixel);
        let next = delta_counts.len();
        delta_counts.entry(delta).or_insert((0, next)).0 += 1;
        for c in 0..3 {
            let abs = pa[c].abs_diff(pb[c]);
            sum_abs[c] += u64::from(abs);
            sum_signed[c] += i64::from(delta[c]);
            max_abs[c] = max_abs[c].max(abs);
        }
    }

    let diff = footprint.pixels_diff;
    let mean = |sum: f64| if diff == 0 { 0.0 } else { sum / diff as f64 };
    let mean_abs = sum_abs.map(|s| mean(s as f64));
    let mean_delta = sum_signed.map(|s| mean(s as f64));

    let mut deltas: Vec<(Delta, (usize, usize))> = delta_counts.into_iter().collect();
    deltas.sort_by_key(|&(_, (count, first))| (Reverse(count), first));
    let top_deltas = deltas
        .into_iter()
        .take(TOP_N)
        .map(|(delta, (count, _))| (delta, count))
        .collect();

    debug!(frame, pixels_diff = diff, "frame diff");
    Ok(FrameDiffStats {
        frame,
        top_rows: footprint.top_rows(TOP_N),
        top_cols: footprint.top_cols(TOP_N),
        footprint,
        mean_abs,
        max_abs,
        mean_delta,
        top_deltas,
    })
}
