//! Text reports for frame, palette and mask comparisons.

use std::io::{self, Write};

use crate::{DiffFootprint, FrameDiffStats, PaletteScan};

/// Entries printed from each ranked list of an RGB report.
pub const RGB_REPORT_TOP: usize = 6;

/// Per-frame RGB difference block.
pub fn write_frame_stats<W: Write + ?Sized>(out: &mut W, stats: &FrameDiffStats) -> io::Result<()> {
    let [mr, mg, mb] = stats.mean_abs;
    let [xr, xg, xb] = stats.max_abs;
    writeln!(
        out,
        "FRAME {}: diff={}/{} ({:.2}%), mean_abs=(R:{mr:.2}, G:{mg:.2}, B:{mb:.2}), max_abs=(R:{xr}, G:{xg}, B:{xb})",
        stats.frame,
        stats.pixels_diff(),
        stats.pixels_total(),
        stats.pct_diff(),
    )?;
    match stats.bbox() {
        None => writeln!(out, "  bbox: none (frames identical)")?,
        Some(bbox) => writeln!(out, "  bbox: {bbox}")?,
    }
    if stats.pixels_diff() > 0 {
        let [sr, sg, sb] = stats.mean_delta;
        writeln!(out, "  mean_delta=(R:{sr:+.2}, G:{sg:+.2}, B:{sb:+.2})")?;
    }

    let deltas: Vec<String> = stats
        .top_deltas
        .iter()
        .take(RGB_REPORT_TOP)
        .map(|([dr, dg, db], count)| format!("(dr={dr},dg={dg},db={db}):{count}"))
        .collect();
    write_ranked(out, "top_deltas", &deltas)?;
    let rows: Vec<String> = stats
        .top_rows
        .iter()
        .take(RGB_REPORT_TOP)
        .map(|(y, count)| format!("y{y}:{count}"))
        .collect();
    write_ranked(out, "top_rows", &rows)?;
    let cols: Vec<String> = stats
        .top_cols
        .iter()
        .take(RGB_REPORT_TOP)
        .map(|(x, count)| format!("x{x}:{count}"))
        .collect();
    write_ranked(out, "top_cols", &cols)
}

fn write_ranked<W: Write + ?Sized>(out: &mut W, label: &str, entries: &[String]) -> io::Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    writeln!(out, "  {label}: {}", entries.join(", "))
}

/// Totals line across all compared frames.
#[allow(clippy::cast_precision_loss)]
pub fn write_rgb_total<W: Write + ?Sized>(out: &mut W, stats: &[FrameDiffStats]) -> io::Result<()> {
    let total: usize = stats.iter().map(FrameDiffStats::pixels_total).sum();
    let diff: usize = stats.iter().map(FrameDiffStats::pixels_diff).sum();
    let pct = if total == 0 {
        0.0
    } else {
        diff as f64 / total as f64 * 100.0
    };
    writeln!(
        out,
        "TOTAL: diff={diff}/{total} ({pct:.2}%) across {} frames",
        stats.len()
    )
}

/// Labels for the two sides of a palette report.
#[derive(Debug, Clone, Copy)]
pub struct PaletteLabels<'a> {
    pub reference: &'a str,
    pub test: &'a str,
}

impl Default for PaletteLabels<'_> {
    fn default() -> Self {
        Self {
            reference: "mesen",
            test: "nesium",
        }
    }
}

/// Per-frame palette mismatch block; prints at most `candidates` candidates.
pub fn write_palette_scan<W: Write + ?Sized>(
    out: &mut W,
    scan: &PaletteScan,
    labels: PaletteLabels<'_>,
    candidates: usize,
) -> io::Result<()> {
    let Some(first) = &scan.first else {
        return writeln!(out, "FRAME {}: no mismatch found ({})", scan.frame, scan.totals);
    };
    let ambiguity = if first.is_ambiguous() {
        format!(" (ambiguous: {} candidates)", first.candidates.len())
    } else {
        String::new()
    };
    writeln!(
        out,
        "FRAME {}: first mismatch at (x={}, y={}, pixel={}) reason={}{ambiguity}",
        scan.frame, first.x, first.y, first.pixel_index, first.reason
    )?;
    let listed: Vec<String> = first
        .candidates
        .iter()
        .take(candidates)
        .map(ToString::to_string)
        .collect();
    let omitted = first.candidates.len().saturating_sub(candidates);
    let more = if omitted > 0 {
        format!(" (+{omitted} more)")
    } else {
        String::new()
    };
    writeln!(
        out,
        "  {}_rgb={} -> candidates: {}{more}",
        labels.reference,
        first.rgb,
        listed.join(", ")
    )?;
    writeln!(
        out,
        "  {}_actual=(idx={:02X}, emph={})",
        labels.test, first.actual.index, first.actual.emphasis
    )?;
    writeln!(out, "  counters_before_first: {}", scan.before_first)?;
    writeln!(out, "  frame_totals: {}", scan.totals)
}

/// Mask difference summary; lists at most `top_rows` rows.
pub fn write_mask_diff<W: Write + ?Sized>(
    out: &mut W,
    footprint: &DiffFootprint,
    top_rows: usize,
) -> io::Result<()> {
    writeln!(
        out,
        "total_pixels={} diff_pixels={}",
        footprint.pixels_total(),
        footprint.pixels_diff
    )?;
    let Some(bbox) = footprint.bbox else {
        return Ok(());
    };
    writeln!(
        out,
        "bbox=x[{},{}] y[{},{}]",
        bbox.min_x, bbox.max_x, bbox.min_y, bbox.max_y
    )?;
    writeln!(out, "rows_with_diff={}", footprint.rows_with_diff())?;
    writeln!(out, "top_rows:")?;
    for (y, count) in footprint.top_rows(top_rows) {
        writeln!(out, "  y={y} diff_pixels={count}")?;
    }
    Ok(())
}
