use std::fmt;

/// Framebuffer dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    pub width: usize,
    pub height: usize,
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self {
            width: 256,
            height: 240,
        }
    }
}

impl FrameGeometry {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub const fn pixel_count(self) -> usize {
        self.width * self.height
    }

    /// Exact byte length of a dump in `format`.
    pub const fn byte_len(self, format: DumpFormat) -> usize {
        match format.bytes_per_pixel() {
            Some(bytes) => self.pixel_count() * bytes,
            None => self.pixel_count().div_ceil(8),
        }
    }

    /// `(x, y)` of a row-major pixel index.
    pub const fn coords(self, pixel: usize) -> (usize, usize) {
        (pixel % self.width, pixel / self.width)
    }
}

impl fmt::Display for FrameGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// On-disk layout of a dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    /// Packed R,G,B bytes per pixel.
    Rgb24,
    /// One byte per pixel (`.idx8` palette indices, `.emph8` emphasis bits).
    Plane8,
    /// One bit per pixel, LSB first.
    Mask1bpp,
}

impl DumpFormat {
    /// Bytes per pixel, `None` for bit-packed formats.
    pub const fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            Self::Rgb24 => Some(3),
            Self::Plane8 => Some(1),
            Self::Mask1bpp => None,
        }
    }
}
