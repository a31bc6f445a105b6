//! End-to-end comparison pipelines.
//!
//! Each pipeline loads and validates all of its inputs before writing any
//! report output, so a fatal input error never leaves a partial report.

use std::io::Write;
use std::path::Path;

use nesdiff_frame::{EMPHASIS_EXT, INDEX_EXT, RGB24_EXT, frame_dump_path};
use nesdiff_trace::report::TraceReport;
use tracing::info;

use crate::metrics::{self, Side};
use crate::report::{self, PaletteLabels};
use crate::{
    DumpFormat, FieldSet, FrameGeometry, FrameList, Result, ReverseMap, SideLabels, TraceLog,
    TraceProfile, compare_events, compare_masks, compute_frame_diff, read_dump, scan_frame,
};

/// Whether a comparison found the two sides in agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Match,
    Diverged,
}

impl Outcome {
    pub const fn is_match(self) -> bool {
        matches!(self, Self::Match)
    }

    const fn from_match(matched: bool) -> Self {
        if matched { Self::Match } else { Self::Diverged }
    }
}

/// Trace comparison settings.
#[derive(Debug, Clone)]
pub struct TraceConfig {
    pub profile: TraceProfile,
    pub fields: FieldSet,
    /// Context window radius around a divergence.
    pub context: usize,
}

impl TraceConfig {
    /// Profile defaults: its default field set and context radius.
    pub fn new(profile: TraceProfile) -> Self {
        let context = match profile {
            TraceProfile::PpuReg => 8,
            TraceProfile::Apu { .. } => 3,
            TraceProfile::Nmi => 4,
        };
        Self {
            profile,
            fields: profile.default_fields(),
            context,
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: FieldSet) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub const fn with_context(mut self, context: usize) -> Self {
        self.context = context;
        self
    }
}

/// Compare two trace files and write the report to `out`.
pub fn compare_traces<W: Write + ?Sized>(
    out: &mut W,
    reference: &Path,
    test: &Path,
    config: &TraceConfig,
) -> Result<Outcome> {
    let reference_log = TraceLog::load(reference, config.profile)?;
    let test_log = TraceLog::load(test, config.profile)?;
    metrics::record_trace_load(Side::Reference, &reference_log);
    metrics::record_trace_load(Side::Test, &test_log);
    info!(
        profile = config.profile.name(),
        reference = reference_log.len(),
        test = test_log.len(),
        "loaded traces"
    );

    let comparison = compare_events(&reference_log.events, &test_log.events, &config.fields);
    metrics::record_trace_comparison(&comparison);

    TraceReport {
        profile: config.profile,
        labels: SideLabels::default(),
        reference: &reference_log,
        test: &test_log,
        fields: &config.fields,
        comparison: &comparison,
        radius: config.context,
    }
    .write(out)?;
    Ok(Outcome::from_match(comparison.is_match()))
}

/// Compare `{prefix}_f{frame}.rgb24` dumps for every frame in `frames`.
pub fn compare_rgb_frames<W: Write + ?Sized>(
    out: &mut W,
    reference_prefix: &Path,
    test_prefix: &Path,
    frames: &FrameList,
    geometry: FrameGeometry,
) -> Result<Outcome> {
    let mut dumps = Vec::with_capacity(frames.len());
    for frame in frames.iter() {
        let reference = read_dump(
            &frame_dump_path(reference_prefix, frame, RGB24_EXT),
            geometry,
            DumpFormat::Rgb24,
        )?;
        let test = read_dump(
            &frame_dump_path(test_prefix, frame, RGB24_EXT),
            geometry,
            DumpFormat::Rgb24,
        )?;
        dumps.push((frame, reference, test));
    }
    info!(frames = dumps.len(), %geometry, "loaded rgb24 dumps");

    let mut all_stats = Vec::with_capacity(dumps.len());
    for (frame, reference, test) in &dumps {
        let stats = compute_frame_diff(*frame, geometry, reference, test)?;
        metrics::record_frame_diff(&stats);
        report::write_frame_stats(out, &stats)?;
        all_stats.push(stats);
    }
    report::write_rgb_total(out, &all_stats)?;

    Ok(Outcome::from_match(all_stats.iter().all(|s| s.is_identical())))
}

/// Palette-level comparison settings.
#[derive(Debug, Clone, Copy)]
pub struct PaletteConfig {
    pub geometry: FrameGeometry,
    /// Candidates listed per mismatch.
    pub candidates: usize,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            geometry: FrameGeometry::default(),
            candidates: 8,
        }
    }
}

/// Explain reference `.rgb24` frames with the test side's `.idx8`/`.emph8`
/// planes and report the first unexplained pixel of each frame.
pub fn scan_palette_frames<W: Write + ?Sized>(
    out: &mut W,
    reference_prefix: &Path,
    test_prefix: &Path,
    frames: &FrameList,
    config: PaletteConfig,
) -> Result<Outcome> {
    let geometry = config.geometry;
    let mut dumps = Vec::with_capacity(frames.len());
    for frame in frames.iter() {
        let rgb24 = read_dump(
            &frame_dump_path(reference_prefix, frame, RGB24_EXT),
            geometry,
            DumpFormat::Rgb24,
        )?;
        let indices = read_dump(
            &frame_dump_path(test_prefix, frame, INDEX_EXT),
            geometry,
            DumpFormat::Plane8,
        )?;
        let emphasis = read_dump(
            &frame_dump_path(test_prefix, frame, EMPHASIS_EXT),
            geometry,
            DumpFormat::Plane8,
        )?;
        dumps.push((frame, rgb24, indices, emphasis));
    }
    info!(frames = dumps.len(), %geometry, "loaded palette dumps");

    let map = ReverseMap::shared();
    let mut matched = true;
    for (frame, rgb24, indices, emphasis) in &dumps {
        let scan = scan_frame(*frame, geometry.width, rgb24, indices, emphasis, map);
        metrics::record_palette_scan(&scan);
        report::write_palette_scan(out, &scan, PaletteLabels::default(), config.candidates)?;
        matched &= scan.is_match();
    }
    Ok(Outcome::from_match(matched))
}

/// Compare two 1bpp masks and list the rows with the most differences.
pub fn compare_mask_files<W: Write + ?Sized>(
    out: &mut W,
    a: &Path,
    b: &Path,
    geometry: FrameGeometry,
    top_rows: usize,
) -> Result<Outcome> {
    let mask_a = read_dump(a, geometry, DumpFormat::Mask1bpp)?;
    let mask_b = read_dump(b, geometry, DumpFormat::Mask1bpp)?;
    let footprint = compare_masks(geometry, &mask_a, &mask_b)?;
    metrics::record_footprint(&footprint);
    report::write_mask_diff(out, &footprint, top_rows)?;
    Ok(Outcome::from_match(footprint.pixels_diff == 0))
}
