//! PPUMASK colour emphasis model.

use crate::{Rgb, base_color};

/// Per-channel factor applied for each set emphasis bit.
pub const EMPHASIS_ATTENUATION: f64 = 0.84;

/// Mask applied to an emphasis plane.
pub const EMPHASIS_MASK: u8 = 0x07;

/// Number of distinct emphasis masks.
pub const EMPHASIS_COUNT: u8 = 8;

/// Apply emphasis bits to a palette index's base colour.
///
/// Bit 0 attenuates green and blue, bit 1 red and blue, bit 2 red and green.
/// Factors compound for multiple bits. Mask 0, and indices whose low nibble
/// is above `0x0D` (the black/grey columns), pass through unchanged.
pub fn apply_emphasis(base: Rgb, index: u8, emphasis: u8) -> Rgb {
    let emphasis = emphasis & EMPHASIS_MASK;
    if emphasis == 0 || (index & 0x0F) > 0x0D {
        return base;
    }

    let mut channels = [f64::from(base.r), f64::from(base.g), f64::from(base.b)];
    for (bit, dimmed) in [(0x01, [1, 2]), (0x02, [0, 2]), (0x04, [0, 1])] {
        if emphasis & bit != 0 {
            for c in dimmed {
                channels[c] *= EMPHASIS_ATTENUATION;
            }
        }
    }
    let [r, g, b] = channels.map(to_channel);
    Rgb::new(r, g, b)
}

/// Colour the PPU outputs for `(index, emphasis)`.
pub fn emphasized_color(index: u8, emphasis: u8) -> Rgb {
    apply_emphasis(base_color(index), index, emphasis)
}

/// Clamp to `[0, 255]` and truncate toward zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}
