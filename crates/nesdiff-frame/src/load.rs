//! Dump file loading and size validation.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{DumpFormat, FrameError, FrameGeometry, Result};

pub const RGB24_EXT: &str = "rgb24";
pub const INDEX_EXT: &str = "idx8";
pub const EMPHASIS_EXT: &str = "emph8";

/// `{prefix}_f{frame}.{ext}`
pub fn frame_dump_path(prefix: &Path, frame: u32, ext: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(format!("_f{frame}.{ext}"));
    PathBuf::from(name)
}

/// Read a file fully, decompressing `.zst` inputs.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    let io_err = |source: std::io::Error| {
        if source.kind() == std::io::ErrorKind::NotFound {
            FrameError::Missing(path.to_path_buf())
        } else {
            FrameError::Io {
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

/// Read a dump and check its length against `geometry` and `format`.
pub fn read_dump(path: &Path, geometry: FrameGeometry, format: DumpFormat) -> Result<Vec<u8>> {
    let data = read_bytes(path)?;
    let expected = geometry.byte_len(format);
    if data.len() != expected {
        return Err(FrameError::SizeMismatch {
            path: path.to_path_buf(),
            expected,
            actual: data.len(),
        });
    }
    debug!(path = %path.display(), bytes = data.len(), "loaded dump");
    Ok(data)
}

/// Unpack a 1bpp mask, LSB first within each byte, row-major.
///
/// Stops at `pixel_count`; padding bits in the last byte are ignored.
pub fn unpack_mask(data: &[u8], pixel_count: usize) -> Vec<bool> {
    data.iter()
        .flat_map(|&byte| (0..8).map(move |bit| (byte >> bit) & 1 != 0))
        .take(pixel_count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_dump_path() {
        let path = frame_dump_path(Path::new("out/mesen"), 60, RGB24_EXT);
        assert_eq!(path, PathBuf::from("out/mesen_f60.rgb24"));
    }

    #[test]
    fn test_unpack_mask_lsb_first() {
        let bits = unpack_mask(&[0b0000_0101, 0b1000_0000], 16);
        let set: Vec<usize> = bits
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
            .collect();
        assert_eq!(set, vec![0, 2, 15]);
    }

    #[test]
    fn test_unpack_mask_ignores_padding() {
        let bits = unpack_mask(&[0xFF, 0xFF], 10);
        assert_eq!(bits.len(), 10);
        assert!(bits.iter().all(|&b| b));
    }
}
