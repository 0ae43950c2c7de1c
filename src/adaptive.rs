//! Adaptive quantization, where the step size is derived from the observed intensity range.
//!
//! For each channel, the range scan finds the minimum and maximum values and the step
//! (or threshold) becomes `(max - min) / 2^bits`. Each value `v` is then mapped to
//! `floor(v / threshold) * threshold`, truncated to an integer.
//! Note that the levels are multiples of the threshold starting from zero,
//! not from the channel minimum.
//!
//! Channels are handled independently, so a channel with a narrow range gets a finer step
//! than a channel with a wide range. A channel where every value is the same
//! (a zero threshold) is returned unchanged.
//!
//! Unlike the [`uniform`](crate::uniform) quantizers, re-applying an adaptive quantizer
//! is not guaranteed to be a no-op, since the quantized image may have a different range.

use crate::{
    luma,
    range::{self, ChannelRange},
    BitDepth, ColorComponents, ColorSlice,
};
use palette::{cast, Srgb, SrgbLuma};
#[cfg(feature = "threads")]
use rayon::prelude::*;

/// The adaptive step size for each channel of an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds<const N: usize>([Option<f64>; N]);

impl<const N: usize> Thresholds<N> {
    /// Computes the step size for each channel from its range.
    ///
    /// The step for a flat channel (`min == max`) is `None`.
    #[must_use]
    pub fn new(ranges: [ChannelRange; N], bits: BitDepth) -> Self {
        let levels = f64::from(bits.num_levels());
        Self(ranges.map(|range| {
            if range.is_flat() {
                None
            } else {
                Some(f64::from(range.span()) / levels)
            }
        }))
    }

    /// Returns the step size for each channel.
    #[must_use]
    pub const fn into_inner(self) -> [Option<f64>; N] {
        self.0
    }

    /// Quantizes each component of `color` with its channel's step.
    #[inline]
    fn apply<Color>(&self, color: Color) -> Color
    where
        Color: ColorComponents<u8, N>,
    {
        let mut components = cast::into_array(color);
        for (value, threshold) in components.iter_mut().zip(self.0) {
            if let Some(threshold) = threshold {
                *value = level(*value, threshold);
            }
        }
        cast::from_array(components)
    }
}

/// Truncates `value` down to a multiple of `threshold`, saturating into the `u8` range.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn level(value: u8, threshold: f64) -> u8 {
    let level = (f64::from(value) / threshold).floor() * threshold;
    level.clamp(0.0, f64::from(u8::MAX)) as u8
}

/// Quantizes each channel of each color with a step size derived from that channel's range.
///
/// An empty input gives an empty output.
#[must_use]
pub fn quantize<Color, const N: usize>(colors: ColorSlice<Color>, bits: BitDepth) -> Vec<Color>
where
    Color: ColorComponents<u8, N>,
{
    let Some(ranges) = range::channel_ranges(colors) else {
        return Vec::new();
    };

    let thresholds = Thresholds::new(ranges, bits);
    colors
        .as_slice()
        .iter()
        .map(|&color| thresholds.apply(color))
        .collect()
}

/// Quantizes each channel of each color with a step size derived from that channel's range
/// in parallel.
///
/// An empty input gives an empty output.
#[cfg(feature = "threads")]
#[must_use]
pub fn quantize_par<Color, const N: usize>(
    colors: ColorSlice<Color>,
    bits: BitDepth,
) -> Vec<Color>
where
    Color: ColorComponents<u8, N> + Send + Sync,
{
    let Some(ranges) = range::channel_ranges_par(colors) else {
        return Vec::new();
    };

    let thresholds = Thresholds::new(ranges, bits);
    colors
        .as_slice()
        .par_iter()
        .map(|&color| thresholds.apply(color))
        .collect()
}

/// Converts the image to grayscale and quantizes it with a step size
/// derived from the grayscale range.
///
/// # Examples
/// ```
/// # use levelette::{adaptive, BitDepth, ColorSlice};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let colors = (0..=255).map(|v| Srgb::new(v, v, v)).collect::<Vec<_>>();
/// let gray = adaptive::gray(ColorSlice::try_from(colors.as_slice())?, BitDepth::try_from(2)?);
/// // the step is 255 / 4 = 63.75
/// assert_eq!(gray[64].luma, 63);
/// assert_eq!(gray[200].luma, 191);
/// assert_eq!(gray[255].luma, 255);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn gray(colors: ColorSlice<Srgb<u8>>, bits: BitDepth) -> Vec<SrgbLuma<u8>> {
    let gray = luma::to_luma(colors);
    quantize(ColorSlice::new_unchecked(&gray), bits)
}

/// Converts the image to grayscale and quantizes it with a step size
/// derived from the grayscale range in parallel.
#[cfg(feature = "threads")]
#[must_use]
pub fn gray_par(colors: ColorSlice<Srgb<u8>>, bits: BitDepth) -> Vec<SrgbLuma<u8>> {
    let gray = luma::to_luma_par(colors);
    quantize_par(ColorSlice::new_unchecked(&gray), bits)
}

/// Quantizes each of the red, green, and blue channels with its own adaptive step size.
#[must_use]
pub fn color(colors: ColorSlice<Srgb<u8>>, bits: BitDepth) -> Vec<Srgb<u8>> {
    quantize(colors, bits)
}

/// Quantizes each of the red, green, and blue channels with its own adaptive step size
/// in parallel.
#[cfg(feature = "threads")]
#[must_use]
pub fn color_par(colors: ColorSlice<Srgb<u8>>, bits: BitDepth) -> Vec<Srgb<u8>> {
    quantize_par(colors, bits)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::*;
    use palette::cast::AsArrays;
    use std::collections::BTreeSet;

    fn bits(bits: u8) -> BitDepth {
        BitDepth::try_from(bits).unwrap()
    }

    #[test]
    fn thresholds_per_channel() {
        let ranges = [
            ChannelRange { min: 0, max: 50 },
            ChannelRange { min: 0, max: 250 },
            ChannelRange { min: 9, max: 9 },
        ];
        let thresholds = Thresholds::new(ranges, bits(2));
        assert_eq!(thresholds.into_inner(), [Some(12.5), Some(62.5), None]);
    }

    #[test]
    fn levels_start_from_zero() {
        let colors = (100..=200).map(SrgbLuma::new).collect::<Vec<SrgbLuma<u8>>>();
        let quantized = quantize(ColorSlice::new_unchecked(&colors), bits(1));

        // threshold = (200 - 100) / 2 = 50
        assert_eq!(quantized[0].luma, 100);
        assert_eq!(quantized[49].luma, 100);
        assert_eq!(quantized[50].luma, 150);
        assert_eq!(quantized[100].luma, 200);
    }

    #[test]
    fn fractional_threshold_truncates() {
        let colors = (0..=u8::MAX).map(SrgbLuma::new).collect::<Vec<SrgbLuma<u8>>>();
        let quantized = quantize(ColorSlice::new_unchecked(&colors), bits(2));

        let levels = quantized.iter().map(|c| c.luma).collect::<BTreeSet<_>>();
        assert_eq!(levels, BTreeSet::from([0, 63, 127, 191, 255]));
    }

    #[test]
    fn flat_image_unchanged() {
        let colors = vec![Srgb::new(100, 100, 100); 64];
        let colors = ColorSlice::new_unchecked(&colors);

        for bits in [bits(1), bits(4), BitDepth::MAX] {
            assert!(gray(colors, bits).iter().all(|c| c.luma == 100));
            assert_eq!(color(colors, bits), colors.as_slice());

            #[cfg(feature = "threads")]
            {
                assert!(gray_par(colors, bits).iter().all(|c| c.luma == 100));
                assert_eq!(color_par(colors, bits), colors.as_slice());
            }
        }
    }

    #[test]
    fn channels_are_independent() {
        // red spans 0..=50, green spans 0..=250, blue is flat
        let colors = (0..=250u8).map(|x| Srgb::new(x / 5, x, 0)).collect::<Vec<_>>();
        let quantized = color(ColorSlice::new_unchecked(&colors), bits(2));

        let channel = |c: usize| {
            quantized
                .as_arrays()
                .iter()
                .map(|color| color[c])
                .collect::<BTreeSet<_>>()
        };

        assert_eq!(channel(0), BTreeSet::from([0, 12, 25, 37, 50]));
        assert_eq!(channel(1), BTreeSet::from([0, 62, 125, 187, 250]));
        assert_eq!(channel(2), BTreeSet::from([0]));
    }

    #[test]
    fn never_above_original() {
        let colors = test_data_1024();
        let colors = ColorSlice::new_unchecked(&colors);

        for bits in [bits(1), bits(3), bits(6)] {
            let quantized = color(colors, bits);
            for (q, c) in quantized.as_arrays().iter().zip(colors.as_slice().as_arrays()) {
                assert!(q.iter().zip(c).all(|(q, c)| q <= c));
            }
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

        for bits in [bits(1), bits(2), bits(5), BitDepth::MAX] {
            assert_eq!(gray(colors, bits), gray_par(colors, bits));
            assert_eq!(color(colors, bits), color_par(colors, bits));
        }
    }
}
