//! Grayscale conversion.
//!
//! Uses the ITU-R BT.601 luma weights (`0.299 R + 0.587 G + 0.114 B`) in 14-bit fixed point,
//! which is exact for 8-bit input and rounds to the nearest integer.

use crate::ColorSlice;
use palette::{Srgb, SrgbLuma};
#[cfg(feature = "threads")]
use rayon::prelude::*;

/// Number of fractional bits in the fixed-point weights.
const SHIFT: u32 = 14;

/// The red weight, `round(0.299 * 2^14)`.
const RED_WEIGHT: u32 = 4899;

/// The green weight, `round(0.587 * 2^14)`.
const GREEN_WEIGHT: u32 = 9617;

/// The blue weight, `round(0.114 * 2^14)`.
const BLUE_WEIGHT: u32 = 1868;

/// Converts a single color to its luma value.
///
/// # Examples
/// ```
/// # use levelette::luma::luma;
/// # use palette::Srgb;
/// assert_eq!(luma(Srgb::new(255, 255, 255)).luma, 255);
/// assert_eq!(luma(Srgb::new(255, 0, 0)).luma, 76);
/// ```
#[must_use]
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub fn luma(color: Srgb<u8>) -> SrgbLuma<u8> {
    let y = u32::from(color.red) * RED_WEIGHT
        + u32::from(color.green) * GREEN_WEIGHT
        + u32::from(color.blue) * BLUE_WEIGHT
        + (1 << (SHIFT - 1));

    // the weights sum to 2^14, so the result is at most 255
    SrgbLuma::new((y >> SHIFT) as u8)
}

/// Converts each color in the slice to its luma value.
#[must_use]
pub fn to_luma(colors: ColorSlice<Srgb<u8>>) -> Vec<SrgbLuma<u8>> {
    colors.as_slice().iter().copied().map(luma).collect()
}

/// Converts each color in the slice to its luma value in parallel.
#[cfg(feature = "threads")]
#[must_use]
pub fn to_luma_par(colors: ColorSlice<Srgb<u8>>) -> Vec<SrgbLuma<u8>> {
    colors.as_slice().par_iter().copied().map(luma).collect()
}
