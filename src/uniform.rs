//! Uniform quantization with a fixed step size of `256 / 2^bits`.
//!
//! Two rounding rules are provided, one for each uniform entry point:
//! - [`gray`] truncates: each value maps to `floor(v / step) * step`,
//!   so a quantized value is never larger than the original.
//! - [`color`] rounds to the nearest level: each value maps to `round(v / step) * step`,
//!   with halfway values rounded up. Values that would round past the top level
//!   (e.g., `255` with a step of `64`) are kept at the top level, `256 - step`.
//!
//! The two rules give different results at and above each halfway point,
//! e.g., `96` with a step of `64` becomes `64` under [`gray`] but `128` under [`color`].
//! Both rules produce at most `2^bits` distinct values per channel,
//! preserve the order of values within a channel, and leave already quantized values unchanged.

use crate::{luma, BitDepth, ColorComponents, ColorSlice};
use palette::{cast, Srgb, SrgbLuma};
#[cfg(feature = "threads")]
use rayon::prelude::*;

/// The distance between adjacent levels, `256 / 2^bits`.
///
/// This is in the range `1..=128`, since a [`BitDepth`] is at most `8`.
#[must_use]
pub const fn step(bits: BitDepth) -> u16 {
    256 >> bits.into_inner()
}

/// Truncates `value` down to a multiple of `step`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn floor_level(value: u8, step: u16) -> u8 {
    // at most value, so it fits in a u8
    (u16::from(value) / step * step) as u8
}

/// Rounds `value` to the nearest multiple of `step`, with ties rounding up,
/// capped at `top`, the largest level below `256`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn nearest_level(value: u8, step: u16, top: u16) -> u8 {
    // `step` is a power of two, so adding half of it rounds ties up (away from zero)
    let level = (u16::from(value) + step / 2) / step;
    (level.min(top) * step) as u8
}

/// Applies `f` to every component of every color.
#[inline]
fn map_components<Color, const N: usize>(color: Color, f: impl Fn(u8) -> u8) -> Color
where
    Color: ColorComponents<u8, N>,
{
    cast::from_array(cast::into_array(color).map(f))
}

/// Quantizes each channel of each color by truncating to a multiple of the uniform step.
#[must_use]
pub fn quantize_floor<Color, const N: usize>(
    colors: ColorSlice<Color>,
    bits: BitDepth,
) -> Vec<Color>
where
    Color: ColorComponents<u8, N>,
{
    let step = step(bits);
    colors
        .as_slice()
        .iter()
        .map(|&color| map_components(color, |v| floor_level(v, step)))
        .collect()
}

/// Quantizes each channel of each color by truncating to a multiple of the uniform step in parallel.
#[cfg(feature = "threads")]
#[must_use]
pub fn quantize_floor_par<Color, const N: usize>(
    colors: ColorSlice<Color>,
    bits: BitDepth,
) -> Vec<Color>
where
    Color: ColorComponents<u8, N> + Send + Sync,
{
    let step = step(bits);
    colors
        .as_slice()
        .par_iter()
        .map(|&color| map_components(color, |v| floor_level(v, step)))
        .collect()
}

/// Quantizes each channel of each color by rounding to the nearest multiple of the uniform step.
#[must_use]
pub fn quantize_nearest<Color, const N: usize>(
    colors: ColorSlice<Color>,
    bits: BitDepth,
) -> Vec<Color>
where
    Color: ColorComponents<u8, N>,
{
    let step = step(bits);
    let top = bits.num_levels() - 1;
    colors
        .as_slice()
        .iter()
        .map(|&color| map_components(color, |v| nearest_level(v, step, top)))
        .collect()
}

/// Quantizes each channel of each color by rounding to the nearest multiple of the uniform step
/// in parallel.
#[cfg(feature = "threads")]
#[must_use]
pub fn quantize_nearest_par<Color, const N: usize>(
    colors: ColorSlice<Color>,
    bits: BitDepth,
) -> Vec<Color>
where
    Color: ColorComponents<u8, N> + Send + Sync,
{
    let step = step(bits);
    let top = bits.num_levels() - 1;
    colors
        .as_slice()
        .par_iter()
        .map(|&color| map_components(color, |v| nearest_level(v, step, top)))
        .collect()
}

/// Converts the image to grayscale and truncates each value to a multiple of the uniform step.
///
/// # Examples
/// ```
/// # use levelette::{uniform, BitDepth, ColorSlice};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let colors = [Srgb::new(96, 96, 96), Srgb::new(159, 159, 159)];
/// let gray = uniform::gray(ColorSlice::try_from(colors.as_slice())?, BitDepth::try_from(2)?);
/// assert_eq!(gray[0].luma, 64);
/// assert_eq!(gray[1].luma, 128);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn gray(colors: ColorSlice<Srgb<u8>>, bits: BitDepth) -> Vec<SrgbLuma<u8>> {
    let gray = luma::to_luma(colors);
    quantize_floor(ColorSlice::new_unchecked(&gray), bits)
}

/// Converts the image to grayscale and truncates each value to a multiple of the uniform step
/// in parallel.
#[cfg(feature = "threads")]
#[must_use]
pub fn gray_par(colors: ColorSlice<Srgb<u8>>, bits: BitDepth) -> Vec<SrgbLuma<u8>> {
    let gray = luma::to_luma_par(colors);
    quantize_floor_par(ColorSlice::new_unchecked(&gray), bits)
}

/// Rounds each channel of each color to the nearest multiple of the uniform step.
///
/// # Examples
/// ```
/// # use levelette::{uniform, BitDepth, ColorSlice};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let colors = [Srgb::new(96, 130, 255)];
/// let quantized = uniform::color(ColorSlice::try_from(colors.as_slice())?, BitDepth::try_from(2)?);
/// assert_eq!(quantized[0], Srgb::new(128, 128, 192));
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn color(colors: ColorSlice<Srgb<u8>>, bits: BitDepth) -> Vec<Srgb<u8>> {
    quantize_nearest(colors, bits)
}

/// Rounds each channel of each color to the nearest multiple of the uniform step in parallel.
#[cfg(feature = "threads")]
#[must_use]
pub fn color_par(colors: ColorSlice<Srgb<u8>>, bits: BitDepth) -> Vec<Srgb<u8>> {
    quantize_nearest_par(colors, bits)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{tests::*, MAX_BITS, MIN_BITS};
    use std::collections::BTreeSet;

    fn all_bit_depths() -> impl Iterator<Item = BitDepth> {
        (MIN_BITS..=MAX_BITS).map(|bits| BitDepth::try_from(bits).unwrap())
    }

    #[test]
    fn step_sizes() {
        let steps = all_bit_depths().map(step).collect::<Vec<_>>();
        assert_eq!(steps, vec![128, 64, 32, 16, 8, 4, 2, 1]);
    }

    #[test]
    fn floor_and_nearest_differ_at_halfway() {
        let step = 64;
        let top = 3;
        assert_eq!(floor_level(96, step), 64);
        assert_eq!(nearest_level(96, step, top), 128);

        assert_eq!(floor_level(95, step), 64);
        assert_eq!(nearest_level(95, step, top), 64);

        assert_eq!(floor_level(130, step), 128);
        assert_eq!(nearest_level(130, step, top), 128);

        assert_eq!(floor_level(159, step), 128);
        assert_eq!(nearest_level(159, step, top), 128);
    }

    #[test]
    fn nearest_caps_at_top_level() {
        assert_eq!(nearest_level(255, 64, 3), 192);
        assert_eq!(nearest_level(224, 64, 3), 192);
        assert_eq!(nearest_level(255, 1, 255), 255);
    }

    #[test]
    fn eight_bits_is_identity() {
        let colors = test_data_1024();
        let colors = ColorSlice::new_unchecked(&colors);
        assert_eq!(color(colors, BitDepth::MAX), colors.as_slice());
        assert_eq!(gray(colors, BitDepth::MAX), luma::to_luma(colors));
    }

    #[test]
    fn level_count_and_order() {
        let values = (0..=u8::MAX).collect::<Vec<_>>();

        for bits in all_bit_depths() {
            let levels = usize::from(bits.num_levels());
            let step = step(bits);
            let top = bits.num_levels() - 1;

            let floor = values.iter().map(|&v| floor_level(v, step)).collect::<Vec<_>>();
            let nearest = values
                .iter()
                .map(|&v| nearest_level(v, step, top))
                .collect::<Vec<_>>();

            for quantized in [&floor, &nearest] {
                assert!(quantized.iter().copied().collect::<BTreeSet<_>>().len() <= levels);
                assert!(quantized.windows(2).all(|w| w[0] <= w[1]));
            }

            assert!(values.iter().zip(&floor).all(|(v, q)| q <= v));
        }
    }

    #[test]
    fn idempotent() {
        let colors = test_data_1024();
        let colors = ColorSlice::new_unchecked(&colors);

        for bits in all_bit_depths() {
            let once = color(colors, bits);
            let twice = color(ColorSlice::new_unchecked(&once), bits);
            assert_eq!(once, twice);

            let once = gray(colors, bits);
            let twice = quantize_floor(ColorSlice::new_unchecked(&once), bits);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn empty_input() {
        let colors = ColorSlice::<Srgb<u8>>::new_unchecked(&[]);
        let bits = BitDepth::default();
        assert!(gray(colors, bits).is_empty());
        assert!(color(colors, bits).is_empty());

        #[cfg(feature = "threads")]
        {
            assert!(gray_par(colors, bits).is_empty());
            assert!(color_par(colors, bits).is_empty());
        }
    }

    #[test]
    #[cfg(feature = "threads")]
    fn single_and_multi_threaded_match() {
        let colors = test_data_1024();
        let colors = ColorSlice::new_unchecked(&colors);

        for bits in all_bit_depths() {
            assert_eq!(gray(colors, bits), gray_par(colors, bits));
            assert_eq!(color(colors, bits), color_par(colors, bits));
        }
    }
}
