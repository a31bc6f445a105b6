//! Positional alignment and first-divergence location.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::{Field, Result, TraceError, TraceEvent};

/// Ordered, duplicate-free set of fields to compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    fields: Vec<Field>,
}

impl FieldSet {
    /// Build a set, rejecting an empty selection.
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Result<Self> {
        let set = Self::from_fields(fields);
        if set.fields.is_empty() {
            return Err(TraceError::NoFields);
        }
        Ok(set)
    }

    pub(crate) fn from_fields(fields: impl IntoIterator<Item = Field>) -> Self {
        let mut out = Vec::new();
        for field in fields {
            if !out.contains(&field) {
                out.push(field);
            }
        }
        Self { fields: out }
    }

    /// Timing-sensitive superset: cycle, frame, scanline, dot, bus payload and
    /// the PPU `v`/`t` registers.
    pub fn strict_timing() -> Self {
        Self::from_fields([
            Field::CpuCycle,
            Field::Frame,
            Field::Scanline,
            Field::Dot,
            Field::Addr,
            Field::Value,
            Field::V,
            Field::T,
        ])
    }

    /// Parse a comma-separated list such as `addr,value`.
    ///
    /// Blank entries are skipped; unknown names and an empty result are errors.
    pub fn parse_csv(s: &str) -> Result<Self> {
        let fields = s
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(Field::from_str)
            .collect::<Result<Vec<_>>>()?;
        Self::new(fields)
    }

    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.iter().copied()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Selected fields on which two events disagree.
    pub fn differing(&self, a: &TraceEvent, b: &TraceEvent) -> Vec<Field> {
        self.iter().filter(|&f| !a.same_field(b, f)).collect()
    }
}

impl FromStr for FieldSet {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_csv(s)
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Field::key).collect();
        f.write_str(&names.join(","))
    }
}

/// How two sequences diverged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivergenceKind {
    /// Selected fields differ at the same ordinal.
    Fields,
    /// Reference has more events (test ended early).
    ReferenceTail,
    /// Test has more events (reference ended early).
    TestTail,
}

impl fmt::Display for DivergenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fields => write!(f, "field mismatch"),
            Self::ReferenceTail => write!(f, "reference trace has extra tail"),
            Self::TestTail => write!(f, "test trace has extra tail"),
        }
    }
}

/// Where and how two traces diverged.
#[derive(Debug, Clone)]
pub struct Divergence {
    /// Ordinal of the first disagreement.
    pub index: usize,
    pub kind: DivergenceKind,
    /// Reference event at `index`, `None` past its end.
    pub reference: Option<TraceEvent>,
    /// Test event at `index`, `None` past its end.
    pub test: Option<TraceEvent>,
    /// Selected fields that differ. Empty for tail divergences.
    pub fields: Vec<Field>,
}

/// Result of comparing two traces.
#[derive(Debug, Clone)]
pub struct TraceComparison {
    /// Events that agreed before the divergence (or in total).
    pub matched: usize,
    pub divergence: Option<Divergence>,
}

impl TraceComparison {
    pub fn is_match(&self) -> bool {
        self.divergence.is_none()
    }
}

/// Compare two event sequences by ordinal.
///
/// Walks the common prefix once and stops at the first event pair whose
/// selected fields differ. No resynchronization is attempted: an inserted or
/// missing event shows up as a mismatch at its ordinal. If the common prefix
/// agrees but lengths differ, the divergence is reported at the shorter
/// length.
pub fn compare_events(
    reference: &[TraceEvent],
    test: &[TraceEvent],
    fields: &FieldSet,
) -> TraceComparison {
    let common = reference.len().min(test.len());

    for (index, (exp, act)) in reference.iter().zip(test).enumerate() {
        let differing = fields.differing(exp, act);
        if !differing.is_empty() {
            debug!(index, fields = %FieldSet::from_fields(differing.iter().copied()), "trace divergence");
            return TraceComparison {
                matched: index,
                divergence: Some(Divergence {
                    index,
                    kind: DivergenceKind::Fields,
                    reference: Some(exp.clone()),
                    test: Some(act.clone()),
                    fields: differing,
                }),
            };
        }
    }

    let kind = match reference.len().cmp(&test.len()) {
        std::cmp::Ordering::Equal => {
            return TraceComparison {
                matched: common,
                divergence: None,
            };
        }
        std::cmp::Ordering::Greater => DivergenceKind::ReferenceTail,
        std::cmp::Ordering::Less => DivergenceKind::TestTail,
    };
    debug!(index = common, %kind, "trace length divergence");

    TraceComparison {
        matched: common,
        divergence: Some(Divergence {
            index: common,
            kind,
            reference: reference.get(common).cloned(),
            test: test.get(common).cloned(),
            fields: Vec::new(),
        }),
    }
}
