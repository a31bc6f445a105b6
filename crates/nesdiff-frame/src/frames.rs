use std::fmt;

use crate::{FrameError, Result};

/// Sorted, deduplicated list of frame numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameList(Vec<u32>);

impl FrameList {
    /// Parse `60,180,360`, requiring at least `min` distinct frames.
    ///
    /// Blank entries are skipped.
    pub fn parse(input: &str, min: usize) -> Result<Self> {
        let invalid = |reason: String| FrameError::InvalidFrames {
            input: input.to_string(),
            reason,
        };
        let mut frames = input
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<u32>()
                    .map_err(|e| invalid(format!("'{token}': {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        frames.sort_unstable();
        frames.dedup();
        if frames.len() < min {
            let noun = if min == 1 { "frame" } else { "frames" };
            return Err(invalid(format!(
                "need at least {min} distinct {noun}, got {}",
                frames.len()
            )));
        }
        Ok(Self(frames))
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl fmt::Display for FrameList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frames: Vec<String> = self.0.iter().map(u32::to_string).collect();
        f.write_str(&frames.join(","))
    }
}
