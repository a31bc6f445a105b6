use tracing::debug;

use crate::{DiffFootprint, FrameError, FrameGeometry, Result, unpack_mask};

/// Compare two 1bpp masks pixel by pixel.
///
/// Both buffers must have the same length. Pixels past the end of a short
/// buffer read as unset.
pub fn compare_masks(geometry: FrameGeometry, a: &[u8], b: &[u8]) -> Result<DiffFootprint> {
    if a.len() != b.len() {
        return Err(FrameError::PairedSizeMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let total = geometry.pixel_count();
    let bits_a = unpack_mask(a, total);
    let bits_b = unpack_mask(b, total);

    let mut footprint = DiffFootprint::new(geometry);
    for pixel in 0..total {
        let pa = bits_a.get(pixel).copied().unwrap_or(false);
        let pb = bits_b.get(pixel).copied().unwrap_or(false);
        if pa != pb {
            footprint.record(pixel);
        }
    }
    debug!(pixels_diff = footprint.pixels_diff, total, "mask diff");
    Ok(footprint)
}
