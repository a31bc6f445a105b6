//! Human-readable divergence reports and context windows.

use std::io::{self, Write};

use crate::{
    Divergence, DivergenceKind, Field, FieldSet, TraceComparison, TraceEvent, TraceLog, TraceProfile,
};

/// Names used for the two sides of a comparison.
#[derive(Debug, Clone, Copy)]
pub struct SideLabels<'a> {
    pub reference: &'a str,
    pub test: &'a str,
}

impl Default for SideLabels<'_> {
    fn default() -> Self {
        Self {
            reference: "mesen",
            test: "nesium",
        }
    }
}

/// Half-open `[start, end)` window of `radius` events around `center`,
/// clamped to `len`.
pub fn window_bounds(len: usize, center: usize, radius: usize) -> (usize, usize) {
    let start = center.saturating_sub(radius).min(len);
    let end = center.saturating_add(radius).saturating_add(1).min(len);
    (start, end)
}

/// One-line summary of an event's comparable payload.
pub fn describe(profile: TraceProfile, event: &TraceEvent) -> String {
    match profile {
        TraceProfile::PpuReg => format!(
            "frame={:>4} sl={:>4} dot={:>3} cpu={:>9} addr={} val={} v={} t={} x={}",
            event.display(Field::Frame),
            event.display(Field::Scanline),
            event.display(Field::Dot),
            event.display(Field::CpuCycle),
            event.display(Field::Addr),
            event.display(Field::Value),
            event.display(Field::V),
            event.display(Field::T),
            event.display(Field::X),
        ),
        TraceProfile::Apu { .. } | TraceProfile::Nmi => {
            if event.kind.has_bus_payload() {
                format!(
                    "{} {}={}",
                    event.kind,
                    event.display(Field::Addr),
                    event.display(Field::Value)
                )
            } else {
                format!("{} -", event.kind)
            }
        }
    }
}

/// Write the events around `center`, marking `center` with `>>`.
pub fn write_window<W: Write + ?Sized>(
    out: &mut W,
    label: &str,
    profile: TraceProfile,
    events: &[TraceEvent],
    center: usize,
    radius: usize,
) -> io::Result<()> {
    let (start, end) = window_bounds(events.len(), center, radius);
    match profile {
        TraceProfile::PpuReg => {
            writeln!(out, "{label} window [{start}..{}]:", end.saturating_sub(1))?;
        }
        TraceProfile::Apu { .. } | TraceProfile::Nmi => {
            writeln!(out, "{label} context [{start}:{end}):")?;
        }
    }
    if start == end {
        writeln!(out, "  (no events)")?;
        return Ok(());
    }
    for (index, event) in events.iter().enumerate().take(end).skip(start) {
        let mark = if index == center { ">>" } else { "  " };
        match profile {
            TraceProfile::PpuReg => {
                writeln!(out, "{mark}#{index:06} {}", describe(profile, event))?;
            }
            TraceProfile::Apu { .. } | TraceProfile::Nmi => {
                writeln!(out, "  {mark} #{index:04} {} | {}", describe(profile, event), event.raw)?;
            }
        }
    }
    Ok(())
}

fn write_side<W: Write + ?Sized>(
    out: &mut W,
    label: &str,
    profile: TraceProfile,
    event: Option<&TraceEvent>,
) -> io::Result<()> {
    match event {
        Some(event) => writeln!(out, "  {label:<8}: {}", describe(profile, event)),
        None => writeln!(out, "  {label:<8}: <end of stream>"),
    }
}

/// Write the divergence header plus both context windows.
pub fn write_divergence<W: Write + ?Sized>(
    out: &mut W,
    profile: TraceProfile,
    labels: SideLabels<'_>,
    reference: &[TraceEvent],
    test: &[TraceEvent],
    divergence: &Divergence,
    radius: usize,
) -> io::Result<()> {
    writeln!(out, "first divergence at event #{}: {}", divergence.index, divergence.kind)?;
    match divergence.kind {
        DivergenceKind::Fields => {
            let fields = FieldSet::new(divergence.fields.iter().copied())
                .map(|set| set.to_string())
                .unwrap_or_default();
            writeln!(out, "  differing fields: {fields}")?;
        }
        DivergenceKind::ReferenceTail | DivergenceKind::TestTail => {
            writeln!(
                out,
                "  event count mismatch: {}={} {}={}",
                labels.reference,
                reference.len(),
                labels.test,
                test.len()
            )?;
        }
    }
    write_side(out, labels.reference, profile, divergence.reference.as_ref())?;
    write_side(out, labels.test, profile, divergence.test.as_ref())?;
    writeln!(out)?;
    write_window(out, labels.reference, profile, reference, divergence.index, radius)?;
    writeln!(out)?;
    write_window(out, labels.test, profile, test, divergence.index, radius)
}

/// A complete comparison report.
#[derive(Debug, Clone, Copy)]
pub struct TraceReport<'a> {
    pub profile: TraceProfile,
    pub labels: SideLabels<'a>,
    pub reference: &'a TraceLog,
    pub test: &'a TraceLog,
    pub fields: &'a FieldSet,
    pub comparison: &'a TraceComparison,
    /// Context window radius around a divergence.
    pub radius: usize,
}

impl TraceReport<'_> {
    pub fn write<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        let labels = self.labels;
        writeln!(out, "{:<15}: {}", format!("{} events", labels.reference), self.reference.len())?;
        writeln!(out, "{:<15}: {}", format!("{} events", labels.test), self.test.len())?;
        writeln!(out, "compare fields : {}", self.fields)?;
        match &self.comparison.divergence {
            None => writeln!(
                out,
                "{} trace: exact match across {} events",
                self.profile.name(),
                self.comparison.matched
            ),
            Some(divergence) => write_divergence(
                out,
                self.profile,
                labels,
                &self.reference.events,
                &self.test.events,
                divergence,
                self.radius,
            ),
        }
    }
}
