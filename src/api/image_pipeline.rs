//! Contains the [`ImagePipeline`] builder struct for the high level API.

use crate::{adaptive, uniform, BitDepth, ColorMode, ColorSlice, QuantizeMethod, ThresholdMode};
use palette::{Srgb, SrgbLuma};
#[cfg(feature = "image")]
use {
    crate::AboveMaxLen,
    image::{DynamicImage, GrayImage, RgbImage},
    palette::cast::IntoComponents,
};

/// The pixels of a quantized image, either grayscale or color depending on the [`ColorMode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Quantized {
    /// One luma value per pixel.
    Gray(Vec<SrgbLuma<u8>>),
    /// One RGB color per pixel.
    Color(Vec<Srgb<u8>>),
}

impl Quantized {
    /// The number of pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Quantized::Gray(pixels) => pixels.len(),
            Quantized::Color(pixels) => pixels.len(),
        }
    }

    /// Whether there are no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The [`ColorMode`] this output was produced with.
    #[must_use]
    pub const fn color_mode(&self) -> ColorMode {
        match self {
            Quantized::Gray(_) => ColorMode::Gray,
            Quantized::Color(_) => ColorMode::Color,
        }
    }

    /// Converts into a [`DynamicImage`] with the given dimensions.
    ///
    /// Returns `None` if the number of pixels is not equal to `width * height`.
    #[cfg(feature = "image")]
    #[must_use]
    pub fn into_image(self, width: u32, height: u32) -> Option<DynamicImage> {
        match self {
            Quantized::Gray(pixels) => {
                GrayImage::from_vec(width, height, pixels.into_components())
                    .map(DynamicImage::ImageLuma8)
            }
            Quantized::Color(pixels) => {
                RgbImage::from_vec(width, height, pixels.into_components())
                    .map(DynamicImage::ImageRgb8)
            }
        }
    }
}

/// A builder struct to specify options to reduce the bit depth of an image.
///
/// # Examples
/// To start, create a [`ImagePipeline`] from a [`RgbImage`] (note that the `image` feature is needed):
/// ```no_run
/// # use levelette::ImagePipeline;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = image::open("some image")?.into_rgb8();
/// let mut pipeline = ImagePipeline::try_from(&img)?;
/// # Ok(())
/// # }
/// ```
///
/// Then, you can change the bit depth and which quantizer to use:
/// ```
/// # use levelette::{ImagePipeline, BitDepth, ColorMode, ThresholdMode};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let srgb = vec![Srgb::new(0, 0, 0)];
/// # let mut pipeline = ImagePipeline::new(srgb.as_slice().try_into()?, 1, 1).unwrap();
/// let pipeline = pipeline
///     .bit_depth(BitDepth::try_from(3)?)
///     .color_mode(ColorMode::Gray)
///     .threshold_mode(ThresholdMode::Adaptive);
/// # Ok(())
/// # }
/// ```
///
/// Finally, run the pipeline:
/// ```
/// # use levelette::{ImagePipeline, AboveMaxLen, Quantized};
/// # use palette::Srgb;
/// # fn main() -> Result<(), AboveMaxLen<u32>> {
/// # let srgb = vec![Srgb::new(96, 96, 96)];
/// # let pipeline = ImagePipeline::new(srgb.as_slice().try_into()?, 1, 1).unwrap();
/// let quantized = pipeline.quantized();
/// assert_eq!(quantized, Quantized::Color(vec![Srgb::new(128, 128, 128)]));
/// # Ok(())
/// # }
/// ```
///
/// Or, in parallel across multiple threads (needs the `threads` feature):
/// ```no_run
/// # use levelette::{ImagePipeline, AboveMaxLen};
/// # use palette::Srgb;
/// # fn main() -> Result<(), AboveMaxLen<u32>> {
/// # let srgb = vec![Srgb::new(0, 0, 0)];
/// # let pipeline = ImagePipeline::new(srgb.as_slice().try_into()?, 1, 1).unwrap();
/// let image = pipeline.quantized_image_par();
/// # Ok(())
/// # }
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct ImagePipeline<'a> {
    /// The input image as a flat slice of pixels.
    pub(crate) colors: ColorSlice<'a, Srgb<u8>>,
    /// The dimensions of the image.
    pub(crate) dimensions: (u32, u32),
    /// The number of bits to keep per channel.
    pub(crate) bits: BitDepth,
    /// The quantizer to run.
    pub(crate) method: QuantizeMethod,
}

impl<'a> ImagePipeline<'a> {
    /// Creates a new [`ImagePipeline`] with default options
    /// and does not validate the size of the input image/slice.
    fn new_unchecked(colors: ColorSlice<'a, Srgb<u8>>, width: u32, height: u32) -> Self {
        Self {
            colors,
            dimensions: (width, height),
            bits: BitDepth::default(),
            method: QuantizeMethod::default(),
        }
    }

    /// Creates a new [`ImagePipeline`] with default options.
    /// Returns `None` if the length of `colors` is not equal to `width * height`.
    #[must_use]
    pub fn new(colors: ColorSlice<'a, Srgb<u8>>, width: u32, height: u32) -> Option<Self> {
        if colors.len() == width as usize * height as usize {
            Some(Self::new_unchecked(colors, width, height))
        } else {
            None
        }
    }

    /// The width and height of the image.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    /// Sets the number of bits to keep per channel.
    ///
    /// The default bit depth is `2` (four levels).
    pub fn bit_depth(&mut self, bits: BitDepth) -> &mut Self {
        self.bits = bits;
        self
    }

    /// Sets whether to output a grayscale or color image.
    ///
    /// The default color mode is [`ColorMode::Color`].
    pub fn color_mode(&mut self, color_mode: ColorMode) -> &mut Self {
        self.method.color_mode = color_mode;
        self
    }

    /// Sets whether the step size is fixed or derived from the image.
    ///
    /// The default threshold mode is [`ThresholdMode::Uniform`].
    pub fn threshold_mode(&mut self, threshold_mode: ThresholdMode) -> &mut Self {
        self.method.threshold_mode = threshold_mode;
        self
    }

    /// Sets both the color mode and the threshold mode at once.
    pub fn quantize_method(&mut self, method: impl Into<QuantizeMethod>) -> &mut Self {
        self.method = method.into();
        self
    }

    /// Runs the pipeline and returns the quantized pixels.
    #[must_use]
    pub fn quantized(&self) -> Quantized {
        let Self { colors, bits, method, .. } = *self;
        match (method.color_mode, method.threshold_mode) {
            (ColorMode::Gray, ThresholdMode::Uniform) => {
                Quantized::Gray(uniform::gray(colors, bits))
            }
            (ColorMode::Color, ThresholdMode::Uniform) => {
                Quantized::Color(uniform::color(colors, bits))
            }
            (ColorMode::Gray, ThresholdMode::Adaptive) => {
                Quantized::Gray(adaptive::gray(colors, bits))
            }
            (ColorMode::Color, ThresholdMode::Adaptive) => {
                Quantized::Color(adaptive::color(colors, bits))
            }
        }
    }
}

#[cfg(feature = "image")]
impl<'a> TryFrom<&'a RgbImage> for ImagePipeline<'a> {
    type Error = AboveMaxLen<u32>;

    fn try_from(image: &'a RgbImage) -> Result<Self, Self::Error> {
        Ok(Self::new_unchecked(
            image.try_into()?,
            image.width(),
            image.height(),
        ))
    }
}

#[cfg(feature = "image")]
impl<'a> ImagePipeline<'a> {
    /// Runs the pipeline and returns the quantized image.
    ///
    /// The result is a [`DynamicImage::ImageLuma8`] for [`ColorMode::Gray`]
    /// and a [`DynamicImage::ImageRgb8`] for [`ColorMode::Color`].
    #[must_use]
    pub fn quantized_image(&self) -> DynamicImage {
        self.to_image(self.quantized())
    }

    /// Wraps quantized pixels into an image with the pipeline's dimensions.
    #[allow(clippy::expect_used)]
    fn to_image(&self, quantized: Quantized) -> DynamicImage {
        let (width, height) = self.dimensions;

        // the quantizers output one pixel per input pixel,
        // and the input length was checked against the dimensions
        quantized
            .into_image(width, height)
            .expect("large enough buffer")
    }
}

#[cfg(feature = "threads")]
impl<'a> ImagePipeline<'a> {
    /// Runs the pipeline in parallel and returns the quantized pixels.
    #[must_use]
    pub fn quantized_par(&self) -> Quantized {
        let Self { colors, bits, method, .. } = *self;
        match (method.color_mode, method.threshold_mode) {
            (ColorMode::Gray, ThresholdMode::Uniform) => {
                Quantized::Gray(uniform::gray_par(colors, bits))
            }
            (ColorMode::Color, ThresholdMode::Uniform) => {
                Quantized::Color(uniform::color_par(colors, bits))
            }
            (ColorMode::Gray, ThresholdMode::Adaptive) => {
                Quantized::Gray(adaptive::gray_par(colors, bits))
            }
            (ColorMode::Color, ThresholdMode::Adaptive) => {
                Quantized::Color(adaptive::color_par(colors, bits))
            }
        }
    }
}

#[cfg(all(feature = "threads", feature = "image"))]
impl<'a> ImagePipeline<'a> {
    /// Runs the pipeline in parallel and returns the quantized image.
    #[must_use]
    pub fn quantized_image_par(&self) -> DynamicImage {
        self.to_image(self.quantized_par())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{tests::*, MAX_BITS, MIN_BITS};
    use palette::cast::AsArrays;
    use std::collections::BTreeSet;

    fn channel_values(quantized: &Quantized, channel: usize) -> Vec<u8> {
        match quantized {
            Quantized::Gray(pixels) => pixels.as_arrays().iter().map(|c| c[channel]).collect(),
            Quantized::Color(pixels) => pixels.as_arrays().iter().map(|c| c[channel]).collect(),
        }
    }

    fn num_channels(quantized: &Quantized) -> usize {
        match quantized.color_mode() {
            ColorMode::Gray => 1,
            ColorMode::Color => 3,
        }
    }

    #[test]
    fn mismatched_dimensions() {
        let colors = test_data_1024();
        let colors = ColorSlice::new_unchecked(&colors);
        assert!(ImagePipeline::new(colors, 32, 31).is_none());
        assert!(ImagePipeline::new(colors, 32, 32).is_some());
    }

    #[test]
    fn output_shape_matches_method() {
        let colors = test_data_1024();
        let colors = ColorSlice::new_unchecked(&colors);
        let mut pipeline = ImagePipeline::new(colors, 32, 32).unwrap();

        for method in QuantizeMethod::ALL {
            let quantized = pipeline.quantize_method(method).quantized();
            assert_eq!(quantized.len(), colors.len());
            assert_eq!(quantized.color_mode(), method.color_mode);
        }
    }

    #[test]
    fn uniform_level_count_and_idempotence() {
        let colors = test_data_1024();
        let colors = ColorSlice::new_unchecked(&colors);
        let mut pipeline = ImagePipeline::new(colors, 32, 32).unwrap();
        pipeline.threshold_mode(ThresholdMode::Uniform);

        for bits in MIN_BITS..=MAX_BITS {
            let bits = BitDepth::try_from(bits).unwrap();
            pipeline.bit_depth(bits);

            for color_mode in [ColorMode::Gray, ColorMode::Color] {
                let quantized = pipeline.color_mode(color_mode).quantized();

                for c in 0..num_channels(&quantized) {
                    let levels = channel_values(&quantized, c)
                        .into_iter()
                        .collect::<BTreeSet<_>>();
                    assert!(levels.len() <= usize::from(bits.num_levels()));
                }

                // a color image can be fed back in directly
                if let Quantized::Color(pixels) = &quantized {
                    let again = ImagePipeline::new(ColorSlice::new_unchecked(pixels), 32, 32)
                        .unwrap()
                        .bit_depth(bits)
                        .quantized();
                    assert_eq!(again, quantized);
                }
            }
        }
    }

    #[test]
    fn uniform_is_monotonic() {
        let colors = (0..=u8::MAX).map(|v| Srgb::new(v, v, v)).collect::<Vec<_>>();
        let colors = ColorSlice::new_unchecked(&colors);
        let mut pipeline = ImagePipeline::new(colors, 256, 1).unwrap();

        for method in [QuantizeMethod::UNIFORM_GRAY, QuantizeMethod::UNIFORM_COLOR] {
            for bits in MIN_BITS..=MAX_BITS {
                let quantized = pipeline
                    .quantize_method(method)
                    .bit_depth(BitDepth::try_from(bits).unwrap())
                    .quantized();

                for c in 0..num_channels(&quantized) {
                    let values = channel_values(&quantized, c);
                    assert!(values.windows(2).all(|w| w[0] <= w[1]));
                }
            }
        }
    }

    #[test]
    fn gray_and_color_differ_at_halfway() {
        let colors = vec![Srgb::new(96, 96, 96)];
        let colors = ColorSlice::new_unchecked(&colors);
        let mut pipeline = ImagePipeline::new(colors, 1, 1).unwrap();
        pipeline.bit_depth(BitDepth::try_from(2).unwrap());

        let gray = pipeline.quantize_method(QuantizeMethod::UNIFORM_GRAY).quantized();
        assert_eq!(gray, Quantized::Gray(vec![SrgbLuma::new(64)]));

        let color = pipeline.quantize_method(QuantizeMethod::UNIFORM_COLOR).quantized();
        assert_eq!(color, Quantized::Color(vec![Srgb::new(128, 128, 128)]));
    }

    #[test]
    fn flat_image_is_unchanged_by_adaptive() {
        let colors = vec![Srgb::new(100, 100, 100); 16];
        let colors = ColorSlice::new_unchecked(&colors);
        let mut pipeline = ImagePipeline::new(colors, 4, 4).unwrap();
        pipeline.threshold_mode(ThresholdMode::Adaptive);

        let gray = pipeline.color_mode(ColorMode::Gray).quantized();
        assert_eq!(gray, Quantized::Gray(vec![SrgbLuma::new(100); 16]));

        let color = pipeline.color_mode(ColorMode::Color).quantized();
        assert_eq!(color, Quantized::Color(colors.to_vec()));
    }

    #[test]
    #[cfg(feature = "image")]
    fn image_output() {
        let image = RgbImage::from_fn(8, 4, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let v = (x * 32 + y) as u8;
            image::Rgb([v, 255 - v, v / 2])
        });
        let mut pipeline = ImagePipeline::try_from(&image).unwrap();

        for method in QuantizeMethod::ALL {
            let output = pipeline.quantize_method(method).quantized_image();
            assert_eq!((output.width(), output.height()), (8, 4));
            match method.color_mode {
                ColorMode::Gray => assert!(matches!(output, DynamicImage::ImageLuma8(_))),
                ColorMode::Color => assert!(matches!(output, DynamicImage::ImageRgb8(_))),
            }
        }
    }

    #[test]
    #[cfg(feature = "threads")]
    fn single_and_multi_threaded_match() {
        let colors = test_data_1024();
        let colors = ColorSlice::new_unchecked(&colors);
        let mut pipeline = ImagePipeline::new(colors, 32, 32).unwrap();

        for method in QuantizeMethod::ALL {
            pipeline.quantize_method(method);
            assert_eq!(pipeline.quantized(), pipeline.quantized_par());
        }
    }
}
