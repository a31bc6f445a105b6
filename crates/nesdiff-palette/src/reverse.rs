//! Inverse palette lookup.

use std::fmt;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{EMPHASIS_COUNT, Rgb, emphasized_color};

/// A `(palette index, emphasis)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Candidate {
    pub index: u8,
    pub emphasis: u8,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(idx={:02X},emph={})", self.index, self.emphasis)
    }
}

/// Every attainable RGB mapped to the pairs that produce it.
///
/// Candidate lists are ordered by index, then emphasis.
#[derive(Debug, Clone)]
pub struct ReverseMap {
    map: FxHashMap<Rgb, Vec<Candidate>>,
}

static SHARED: OnceLock<ReverseMap> = OnceLock::new();

impl ReverseMap {
    /// Build the map over all 64 indices and 8 emphasis masks.
    pub fn build() -> Self {
        let mut map: FxHashMap<Rgb, Vec<Candidate>> = FxHashMap::default();
        for index in 0..64u8 {
            for emphasis in 0..EMPHASIS_COUNT {
                map.entry(emphasized_color(index, emphasis))
                    .or_default()
                    .push(Candidate { index, emphasis });
            }
        }
        debug!(colors = map.len(), "built reverse palette map");
        Self { map }
    }

    /// Process-wide map, built on first use.
    pub fn shared() -> &'static Self {
        SHARED.get_or_init(Self::build)
    }

    /// Candidates for `rgb`; empty when no pair produces it.
    pub fn candidates(&self, rgb: Rgb) -> &[Candidate] {
        self.map.get(&rgb).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct attainable colours.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
