//! Contains the strategy types that select one of the four quantizers.

use std::fmt::Display;

/// Whether the output image keeps its three color channels or is reduced to a single luma channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorMode {
    /// Convert to grayscale first, then quantize the luma channel.
    Gray,
    /// Quantize each of the red, green, and blue channels.
    #[default]
    Color,
}

/// How the distance between quantization levels is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThresholdMode {
    /// A fixed step of `256 / 2^bits`, independent of the image.
    ///
    /// See the [`uniform`](crate::uniform) module for more details.
    #[default]
    Uniform,
    /// A step of `(max - min) / 2^bits` computed from each channel's observed range.
    ///
    /// See the [`adaptive`](crate::adaptive) module for more details.
    Adaptive,
}

/// One of the four quantizers, given by a [`ColorMode`] and a [`ThresholdMode`].
///
/// # Examples
/// ```
/// # use levelette::{ColorMode, QuantizeMethod, ThresholdMode};
/// let method = QuantizeMethod::new(ColorMode::Gray, ThresholdMode::Adaptive);
/// assert_eq!(method, QuantizeMethod::ADAPTIVE_GRAY);
/// assert_eq!(method.to_string(), "adaptive_gray");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QuantizeMethod {
    /// The output channel layout.
    pub color_mode: ColorMode,
    /// The level spacing rule.
    pub threshold_mode: ThresholdMode,
}

impl QuantizeMethod {
    /// Fixed step on the luma channel, truncating each value down to its level.
    pub const UNIFORM_GRAY: Self = Self::new(ColorMode::Gray, ThresholdMode::Uniform);

    /// Fixed step on each color channel, rounding each value to the nearest level.
    pub const UNIFORM_COLOR: Self = Self::new(ColorMode::Color, ThresholdMode::Uniform);

    /// Range-derived step on the luma channel.
    pub const ADAPTIVE_GRAY: Self = Self::new(ColorMode::Gray, ThresholdMode::Adaptive);

    /// Range-derived step on each color channel, computed per channel.
    pub const ADAPTIVE_COLOR: Self = Self::new(ColorMode::Color, ThresholdMode::Adaptive);

    /// Every supported quantizer.
    pub const ALL: [Self; 4] = [
        Self::UNIFORM_GRAY,
        Self::UNIFORM_COLOR,
        Self::ADAPTIVE_GRAY,
        Self::ADAPTIVE_COLOR,
    ];

    /// Creates a new [`QuantizeMethod`] from its two settings.
    #[must_use]
    pub const fn new(color_mode: ColorMode, threshold_mode: ThresholdMode) -> Self {
        Self { color_mode, threshold_mode }
    }
}

impl From<(ColorMode, ThresholdMode)> for QuantizeMethod {
    fn from((color_mode, threshold_mode): (ColorMode, ThresholdMode)) -> Self {
        Self::new(color_mode, threshold_mode)
    }
}

impl Display for QuantizeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let threshold = match self.threshold_mode {
            ThresholdMode::Uniform => "uniform",
            ThresholdMode::Adaptive => "adaptive",
        };
        let color = match self.color_mode {
            ColorMode::Gray => "gray",
            ColorMode::Color => "color",
        };
        write!(f, "{threshold}_{color}")
    }
}
