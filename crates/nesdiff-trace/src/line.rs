//! `TAG|key=value|...` line splitting and hex field normalization.

use std::sync::OnceLock;

use regex::Regex;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Segment delimiter between the tag and each `key=value` pair.
pub const DELIMITER: char = '|';

/// A hex field that could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid hex value {0:?}")]
pub struct HexError(pub String);

/// Free-form key/value fields of one trace line.
///
/// Every key seen on the line is kept, including keys no comparator uses.
/// Typed accessors return `None` for absent or unparsable values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceFields {
    map: FxHashMap<String, String>,
}

impl TraceFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw string value of a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Insert or replace a value. Later duplicates on a line win.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.map.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Decimal integer value.
    pub fn decimal(&self, key: &str) -> Option<i64> {
        self.get(key)?.trim().parse().ok()
    }

    /// Hexadecimal value. An empty value reads as zero.
    pub fn hex(&self, key: &str) -> Option<u64> {
        parse_hex(self.get(key)?).ok()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TraceFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

/// Split a line into its `key=value` segments.
///
/// Each segment is split on its first `=`; segments without one (including
/// the tag itself) are ignored.
pub fn parse_fields(line: &str) -> TraceFields {
    line.trim()
        .split(DELIMITER)
        .filter_map(|segment| segment.split_once('='))
        .collect()
}

/// Parse a line carrying `tag`.
///
/// Returns `None` if the line does not start with `TAG|` or has no
/// `key=value` segments at all.
pub fn parse_tagged_line(line: &str, tag: &str) -> Option<TraceFields> {
    let body = line.trim().strip_prefix(tag)?.strip_prefix(DELIMITER)?;
    let fields = parse_fields(body);
    if fields.is_empty() { None } else { Some(fields) }
}

/// Parse a hex string, tolerating surrounding whitespace and a `0x` prefix.
///
/// An empty value (or a bare `0x`) is zero.
pub fn parse_hex(value: &str) -> Result<u64, HexError> {
    let pattern = HEX_PATTERN
        .get_or_init(|| Regex::new(r"^(?:0[xX])?([0-9a-fA-F]*)$").unwrap());
    let caps = pattern
        .captures(value.trim())
        .ok_or_else(|| HexError(value.to_string()))?;
    let digits = caps.get(1).map_or("", |m| m.as_str());
    if digits.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(digits, 16).map_err(|_| HexError(value.to_string()))
}

/// Normalize a hex string to upper case, zero-padded to `width` digits.
///
/// Values wider than `width` are kept whole.
pub fn normalize_hex(value: &str, width: usize) -> Result<String, HexError> {
    let parsed = parse_hex(value)?;
    Ok(format!("{parsed:0width$X}"))
}

static HEX_PATTERN: OnceLock<Regex> = OnceLock::new();
