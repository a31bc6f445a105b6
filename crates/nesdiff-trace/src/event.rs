//! Canonical trace event model.

use std::fmt;
use std::str::FromStr;

use crate::{TraceError, TraceFields};

/// Value reported for numeric fields that are absent or unparsable.
pub const SENTINEL: i64 = -1;

/// Canonical event kind shared by both emulators' traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Read,
    Write,
    ReadMem,
    NmiTake,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::ReadMem => "read_mem",
            Self::NmiTake => "nmi_take",
        }
    }

    /// Look up a canonical label. Source-specific labels are resolved by
    /// [`crate::TraceProfile::normalize_kind`].
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "read" => Some(Self::Read),
            "write" => Some(Self::Write),
            "read_mem" => Some(Self::ReadMem),
            "nmi_take" => Some(Self::NmiTake),
            _ => None,
        }
    }

    /// Whether events of this kind carry an address/value bus payload.
    pub fn has_bus_payload(self) -> bool {
        !matches!(self, Self::NmiTake)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A comparable event field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The normalized event kind (`ev=`).
    Kind,
    CpuCycle,
    Frame,
    Scanline,
    Dot,
    Addr,
    Value,
    /// PPU internal `v` register.
    V,
    /// PPU internal `t` register.
    T,
    /// PPU fine-x scroll.
    X,
}

impl Field {
    pub const ALL: [Self; 10] = [
        Self::Kind,
        Self::CpuCycle,
        Self::Frame,
        Self::Scanline,
        Self::Dot,
        Self::Addr,
        Self::Value,
        Self::V,
        Self::T,
        Self::X,
    ];

    /// Key used for this field in trace lines.
    pub fn key(self) -> &'static str {
        match self {
            Self::Kind => "ev",
            Self::CpuCycle => "cpu_cycle",
            Self::Frame => "frame",
            Self::Scanline => "scanline",
            Self::Dot => "dot",
            Self::Addr => "addr",
            Self::Value => "value",
            Self::V => "v",
            Self::T => "t",
            Self::X => "x",
        }
    }

    /// Digits to render a hex field with, `None` for decimal fields.
    pub fn hex_width(self) -> Option<usize> {
        match self {
            Self::Addr | Self::V | Self::T => Some(4),
            Self::Value | Self::X => Some(2),
            Self::Kind | Self::CpuCycle | Self::Frame | Self::Scanline | Self::Dot => None,
        }
    }

    /// Fields that only exist on kinds with a bus payload.
    pub fn is_bus_payload(self) -> bool {
        matches!(self, Self::Addr | Self::Value)
    }

    pub(crate) fn supported_list() -> String {
        Self::ALL.map(Self::key).join(",")
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| TraceError::UnknownField(s.to_string()))
    }
}

/// One normalized hardware event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    /// Position in the source sequence. Dense, starting at 0.
    pub ordinal: usize,
    /// Normalized kind.
    pub kind: EventKind,
    /// Every field seen on the line.
    pub fields: TraceFields,
    /// The original line, without its line terminator.
    pub raw: String,
}

impl TraceEvent {
    /// Numeric value of a field, or [`SENTINEL`] when absent or unparsable.
    ///
    /// Hex fields are read as hex. `Field::Kind` is not numeric and always
    /// yields the sentinel; compare kinds with [`TraceEvent::same_field`].
    pub fn numeric(&self, field: Field) -> i64 {
        if field == Field::Kind || (field.is_bus_payload() && !self.kind.has_bus_payload()) {
            return SENTINEL;
        }
        let parsed = if field.hex_width().is_some() {
            self.fields
                .hex(field.key())
                .and_then(|v| i64::try_from(v).ok())
        } else {
            self.fields.decimal(field.key())
        };
        parsed.unwrap_or(SENTINEL)
    }

    /// Whether `field` agrees between two events.
    pub fn same_field(&self, other: &Self, field: Field) -> bool {
        match field {
            Field::Kind => self.kind == other.kind,
            _ => self.numeric(field) == other.numeric(field),
        }
    }

    /// Field value formatted for reports.
    ///
    /// Hex fields are fixed width upper case; absent values print as dashes.
    pub fn display(&self, field: Field) -> String {
        if field == Field::Kind {
            return self.kind.to_string();
        }
        let value = self.numeric(field);
        match field.hex_width() {
            Some(width) if value == SENTINEL => "-".repeat(width),
            Some(width) => format!("{value:0width$X}"),
            None => value.to_string(),
        }
    }
}
