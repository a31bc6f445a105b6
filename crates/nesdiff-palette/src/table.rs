use std::fmt;

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Read the pixel at `pixel` from packed RGB24 data.
    pub fn from_rgb24(data: &[u8], pixel: usize) -> Option<Self> {
        let px = data.get(pixel * 3..pixel * 3 + 3)?;
        Some(Self::new(px[0], px[1], px[2]))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Number of palette entries.
pub const PALETTE_SIZE: usize = 64;

/// Mask applied to a palette index plane.
pub const INDEX_MASK: u8 = 0x3F;

const fn rgb(r: u8, g: u8, b: u8) -> Rgb {
    Rgb::new(r, g, b)
}

/// Base RGB for each 2C02 palette index (Mesen2 default palette).
#[rustfmt::skip]
pub static PALETTE_2C02: [Rgb; PALETTE_SIZE] = [
    // 0x00
    rgb(0x66, 0x66, 0x66), rgb(0x00, 0x2A, 0x88), rgb(0x14, 0x12, 0xA7), rgb(0x3B, 0x00, 0xA4),
    rgb(0x5C, 0x00, 0x7E), rgb(0x6E, 0x00, 0x40), rgb(0x6C, 0x06, 0x00), rgb(0x56, 0x1D, 0x00),
    rgb(0x33, 0x35, 0x00), rgb(0x0B, 0x48, 0x00), rgb(0x00, 0x52, 0x00), rgb(0x00, 0x4F, 0x08),
    rgb(0x00, 0x40, 0x4D), rgb(0x00, 0x00, 0x00), rgb(0x00, 0x00, 0x00), rgb(0x00, 0x00, 0x00),
    // 0x10
    rgb(0xAD, 0xAD, 0xAD), rgb(0x15, 0x5F, 0xD9), rgb(0x42, 0x40, 0xFF), rgb(0x75, 0x27, 0xFE),
    rgb(0xA0, 0x1A, 0xCC), rgb(0xB7, 0x1E, 0x7B), rgb(0xB5, 0x31, 0x20), rgb(0x99, 0x4E, 0x00),
    rgb(0x6B, 0x6D, 0x00), rgb(0x38, 0x87, 0x00), rgb(0x0C, 0x93, 0x00), rgb(0x00, 0x8F, 0x32),
    rgb(0x00, 0x7C, 0x8D), rgb(0x00, 0x00, 0x00), rgb(0x00, 0x00, 0x00), rgb(0x00, 0x00, 0x00),
    // 0x20
    rgb(0xFF, 0xFE, 0xFF), rgb(0x64, 0xB0, 0xFF), rgb(0x92, 0x90, 0xFF), rgb(0xC6, 0x76, 0xFF),
    rgb(0xF3, 0x6A, 0xFF), rgb(0xFE, 0x6E, 0xCC), rgb(0xFE, 0x81, 0x70), rgb(0xEA, 0x9E, 0x22),
    rgb(0xBC, 0xBE, 0x00), rgb(0x88, 0xD8, 0x00), rgb(0x5C, 0xE4, 0x30), rgb(0x45, 0xE0, 0x82),
    rgb(0x48, 0xCD, 0xDE), rgb(0x4F, 0x4F, 0x4F), rgb(0x00, 0x00, 0x00), rgb(0x00, 0x00, 0x00),
    // 0x30
    rgb(0xFF, 0xFE, 0xFF), rgb(0xC0, 0xDF, 0xFF), rgb(0xD3, 0xD2, 0xFF), rgb(0xE8, 0xC8, 0xFF),
    rgb(0xFB, 0xC2, 0xFF), rgb(0xFE, 0xC4, 0xEA), rgb(0xFE, 0xCC, 0xC5), rgb(0xF7, 0xD8, 0xA5),
    rgb(0xE4, 0xE5, 0x94), rgb(0xCF, 0xEF, 0x96), rgb(0xBD, 0xF4, 0xAB), rgb(0xB3, 0xF3, 0xCC),
    rgb(0xB5, 0xEB, 0xF2), rgb(0xB8, 0xB8, 0xB8), rgb(0x00, 0x00, 0x00), rgb(0x00, 0x00, 0x00),
];

/// Base colour of a palette index; bits above [`INDEX_MASK`] are ignored.
pub fn base_color(index: u8) -> Rgb {
    PALETTE_2C02[usize::from(index & INDEX_MASK)]
}
