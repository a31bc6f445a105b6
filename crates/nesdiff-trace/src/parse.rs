use std::path::Path;

use tracing::{debug, warn};

use crate::{Result, TraceError, TraceEvent, TraceProfile, parse_tagged_line};

/// Events parsed from one trace, with line accounting.
#[derive(Debug, Clone, Default)]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
    /// Lines read.
    pub lines: usize,
    /// Lines without the profile tag (or without any `key=value`).
    pub untagged: usize,
    /// Tagged lines the profile dropped.
    pub dropped: usize,
}

impl TraceLog {
    /// Parse trace text.
    pub fn parse(text: &str, profile: TraceProfile) -> Self {
        let mut log = Self::default();
        for line in text.lines() {
            log.lines += 1;
            let Some(fields) = parse_tagged_line(line, profile.tag()) else {
                log.untagged += 1;
                continue;
            };
            match profile.normalize(log.events.len(), fields, line) {
                Some(event) => log.events.push(event),
                None => log.dropped += 1,
            }
        }
        log
    }

    /// Load a trace file. Paths ending in `.zst` are decompressed first;
    /// invalid UTF-8 is replaced rather than rejected.
    pub fn load(path: &Path, profile: TraceProfile) -> Result<Self> {
        let data = read_input(path)?;
        let log = Self::parse(&String::from_utf8_lossy(&data), profile);
        debug!(
            path = %path.display(),
            events = log.events.len(),
            lines = log.lines,
            untagged = log.untagged,
            dropped = log.dropped,
            "loaded trace"
        );
        if log.events.is_empty() && log.lines > 0 {
            warn!(path = %path.display(), tag = profile.tag(), "no comparable events in trace");
        }
        Ok(log)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Parse a trace file into events.
pub fn parse_trace_file(path: &Path, profile: TraceProfile) -> Result<Vec<TraceEvent>> {
    TraceLog::load(path, profile).map(|log| log.events)
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    let io_err = |source: std::io::Error| {
        if source.kind() == std::io::ErrorKind::NotFound {
            TraceError::Missing(path.to_path_buf())
        } else {
            TraceError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    };
    let data = std::fs::read(path).map_err(io_err)?;
    if path.extension().is_some_and(|ext| ext == "zst") {
        return zstd::decode_all(data.as_slice()).map_err(io_err);
    }
    Ok(data)
}
