//! Per-pipeline vocabulary: which tag, which kinds, which payload rules.

use tracing::trace;

use crate::{EventKind, Field, FieldSet, TraceEvent, TraceFields};

/// Source-specific kind labels, keyed by `(src, ev)`.
const NMI_ALIASES: &[(&str, &str, EventKind)] = &[
    ("mesen", "nmi_event", EventKind::NmiTake),
    ("nesium", "nmi_take", EventKind::NmiTake),
];

/// How a bus payload field must appear for an event to be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadRule {
    /// Absent or malformed values read as the sentinel.
    Optional,
    /// Must be present, non-empty and valid hex, or the event is dropped.
    Required,
    /// Must be present and valid hex; an empty value reads as zero.
    Present,
    /// Filled in with this value when absent.
    Defaulted(&'static str),
}

/// A trace pipeline: register writes, APU bus traffic or NMI timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceProfile {
    /// `PPUREG` register-write traces.
    PpuReg,
    /// `APUTRACE` bus traces.
    Apu {
        /// Keep `ev=read_mem` events.
        include_read_mem: bool,
    },
    /// `NMITRACE` interrupt timing traces.
    Nmi,
}

impl TraceProfile {
    /// Line tag, without the trailing delimiter.
    pub fn tag(self) -> &'static str {
        match self {
            Self::PpuReg => "PPUREG",
            Self::Apu { .. } => "APUTRACE",
            Self::Nmi => "NMITRACE",
        }
    }

    /// Fields compared when the caller selects none.
    pub fn default_fields(self) -> FieldSet {
        match self {
            Self::PpuReg => FieldSet::from_fields([Field::Addr, Field::Value]),
            Self::Apu { .. } | Self::Nmi => {
                FieldSet::from_fields([Field::Kind, Field::Addr, Field::Value])
            }
        }
    }

    /// Map a line's `(src, ev)` onto a canonical kind this profile accepts.
    pub fn normalize_kind(self, src: &str, ev: &str) -> Option<EventKind> {
        match self {
            Self::PpuReg => (ev == "write").then_some(EventKind::Write),
            Self::Apu { include_read_mem } => match EventKind::from_label(ev)? {
                kind @ (EventKind::Read | EventKind::Write) => Some(kind),
                EventKind::ReadMem if include_read_mem => Some(EventKind::ReadMem),
                _ => None,
            },
            Self::Nmi => match ev {
                "read" => Some(EventKind::Read),
                "write" => Some(EventKind::Write),
                _ => NMI_ALIASES
                    .iter()
                    .find(|(alias_src, alias_ev, _)| *alias_src == src && *alias_ev == ev)
                    .map(|&(_, _, kind)| kind),
            },
        }
    }

    fn payload_rules(self, kind: EventKind) -> (PayloadRule, PayloadRule) {
        if !kind.has_bus_payload() {
            return (PayloadRule::Optional, PayloadRule::Optional);
        }
        match self {
            Self::PpuReg => (PayloadRule::Optional, PayloadRule::Optional),
            Self::Apu { .. } => (PayloadRule::Required, PayloadRule::Defaulted("00")),
            Self::Nmi => (PayloadRule::Present, PayloadRule::Present),
        }
    }

    /// Turn parsed fields into an event, or `None` if the profile drops it.
    ///
    /// The caller assigns `ordinal` only to kept events, so dropped lines
    /// never consume one.
    pub fn normalize(self, ordinal: usize, mut fields: TraceFields, raw: &str) -> Option<TraceEvent> {
        let src = fields.get("src").unwrap_or("");
        let ev = fields.get("ev").unwrap_or("");
        let Some(kind) = self.normalize_kind(src, ev) else {
            trace!(ev, src, "dropping unrecognized event kind");
            return None;
        };

        let (addr_rule, value_rule) = self.payload_rules(kind);
        for (field, rule) in [(Field::Addr, addr_rule), (Field::Value, value_rule)] {
            let key = field.key();
            match rule {
                PayloadRule::Optional => {}
                PayloadRule::Required | PayloadRule::Present => {
                    let non_empty = fields.get(key).is_some_and(|v| !v.trim().is_empty());
                    let rejected = rule == PayloadRule::Required && !non_empty;
                    if rejected || fields.hex(key).is_none() {
                        trace!(key, %kind, "dropping event without required payload");
                        return None;
                    }
                }
                PayloadRule::Defaulted(default) => {
                    if !fields.contains(key) {
                        fields.insert(key, default);
                    }
                }
            }
        }

        Some(TraceEvent {
            ordinal,
            kind,
            fields,
            raw: raw.trim_end_matches(['\r', '\n']).to_string(),
        })
    }

    /// Short name used in reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::PpuReg => "ppu-reg",
            Self::Apu { .. } => "apu",
            Self::Nmi => "nmi",
        }
    }
}
