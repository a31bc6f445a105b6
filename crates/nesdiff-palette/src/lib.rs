//! NES 2C02 palette model.
//!
//! Explains RGB framebuffers in terms of `(palette index, emphasis bits)`
//! pairs: a static base palette, the emphasis attenuation model, an inverse
//! `RGB -> candidates` map and a scanner for the first pixel the test side
//! renders from the wrong pair.

mod emphasis;
mod mismatch;
mod reverse;
mod table;

pub use emphasis::*;
pub use mismatch::*;
pub use reverse::*;
pub use table::*;

#[cfg(test)]
mod tests;
